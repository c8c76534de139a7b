use core::{error, fmt};

use crate::info::{ArrayInfo, ListInfo, MapInfo, PairInfo};
use crate::info::{DynamicInfo, OptionInfo, SharedInfo};
use crate::info::{LeafInfo, StructInfo, TupleInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type, without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Struct,
    Tuple,
    List,
    Array,
    Map,
    Pair,
    Option,
    Shared,
    Dynamic,
    Leaf,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Struct => "Struct",
            Self::Tuple => "Tuple",
            Self::List => "List",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Pair => "Pair",
            Self::Option => "Option",
            Self::Shared => "Shared",
            Self::Dynamic => "Dynamic",
            Self::Leaf => "Leaf",
        };
        f.pad(name)
    }
}

/// Returned by the `TypeInfo::as_*` casts on a kind mismatch.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static description of a reflected type.
///
/// One variant per [`ReflectKind`]. Obtained through
/// [`Typed::type_info`](crate::info::Typed::type_info) and valid for the
/// whole process.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Struct(StructInfo),
    Tuple(TupleInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Pair(PairInfo),
    Option(OptionInfo),
    Shared(SharedInfo),
    Dynamic(DynamicInfo),
    Leaf(LeafInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`], or an error for other kinds.")]
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_tuple: Tuple => TupleInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_pair: Pair => PairInfo);
    impl_cast_method!(as_option: Option => OptionInfo);
    impl_cast_method!(as_shared: Shared => SharedInfo);
    impl_cast_method!(as_leaf: Leaf => LeafInfo);

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::Tuple(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Pair(info) => info.ty(),
            Self::Option(info) => info.ty(),
            Self::Shared(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::Leaf(info) => info.ty(),
        }
    }

    crate::info::impl_type_fn!();

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Tuple(_) => ReflectKind::Tuple,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Pair(_) => ReflectKind::Pair,
            Self::Option(_) => ReflectKind::Option,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Leaf(_) => ReflectKind::Leaf,
        }
    }
}
