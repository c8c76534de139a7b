use alloc::boxed::Box;
use alloc::sync::Arc;

use tg_reflect::info::{LeafKind, Type, TypeInfo};

// -----------------------------------------------------------------------------
// PlanShape

/// How a planned type appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanShape {
    /// A single leaf opcode.
    Leaf(LeafKind),
    /// `TYPE_START` ... `TYPE_END`, with list or map items after the
    /// properties if `list_like` or `map_like`.
    Composite { list_like: bool, map_like: bool },
    /// `TUPLE_START` arity ... `TUPLE_END`.
    Tuple { arity: usize },
    /// `PAIR_START` key value `PAIR_END`.
    Pair,
}

// -----------------------------------------------------------------------------
// ItemSource

/// Where the elements of a list or map come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// The planned value is the container.
    Value,
    /// The struct field marked `#[reflect(items)]`.
    ItemsField,
}

// -----------------------------------------------------------------------------
// Slot

/// A position inside a tuple or pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Field(usize),
    Key,
    Value,
}

// -----------------------------------------------------------------------------
// PlanItem

/// One instruction of a [`Plan`].
#[derive(Debug, Clone)]
pub enum PlanItem {
    /// Bytes known when the plan is compiled, e.g. closing markers.
    WriteConstantBytes(Box<[u8]>),
    /// Type header: a shape back-reference, a known type fingerprint, or the
    /// type path and property names.
    TypeStart,
    ListStart {
        source: ItemSource,
        element_hint: Option<Arc<Plan>>,
    },
    MapStart {
        source: ItemSource,
        key_hint: Option<Arc<Plan>>,
        value_hint: Option<Arc<Plan>>,
    },
    TupleStart {
        arity: u8,
    },
    PairStart,
    /// A leaf-typed field, written inline or as `NULL` when zero.
    PropertyValue {
        field: usize,
        codec: LeafKind,
    },
    /// Any other field.
    PropertyReference {
        field: usize,
        declared: &'static TypeInfo,
        hint: Option<Arc<Plan>>,
    },
    /// The planned value is itself a leaf.
    ValueLeaf {
        codec: LeafKind,
    },
    /// A tuple or pair slot, written with its runtime type.
    RuntimeTypedValue {
        slot: Slot,
        declared: &'static TypeInfo,
        hint: Option<Arc<Plan>>,
    },
}

// -----------------------------------------------------------------------------
// Plan

/// The compiled encoding of one type.
///
/// Plans are built once per type and shared by every codec in the process,
/// see [`PlanCache`](crate::plan::PlanCache).
#[derive(Debug)]
pub struct Plan {
    pub(crate) ty: Type,
    pub(crate) type_info: &'static TypeInfo,
    pub(crate) shape: PlanShape,
    pub(crate) property_names: Box<[&'static str]>,
    pub(crate) items: Box<[PlanItem]>,
}

impl Plan {
    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline]
    pub fn shape(&self) -> PlanShape {
        self.shape
    }

    /// Property names in wire order. Empty for everything but structs.
    #[inline]
    pub fn property_names(&self) -> &[&'static str] {
        &self.property_names
    }

    #[inline]
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }
}
