use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use tg_reflect::info::TypeInfo;
use tg_utils::TypeIdMap;

use super::{ItemSource, Plan, PlanItem, PlanShape, Slot};
use crate::wire;

/// Strips `Option`, `Shared` and `Box<dyn Reflect>` wrappers.
///
/// Returns `None` for `Box<dyn Reflect>`, whose type is only known per value.
pub(crate) fn unwrap_info(mut info: &'static TypeInfo) -> Option<&'static TypeInfo> {
    loop {
        info = match info {
            TypeInfo::Option(inner) => inner.inner().info(),
            TypeInfo::Shared(inner) => inner.inner().info(),
            TypeInfo::Dynamic(_) => return None,
            _ => return Some(info),
        };
    }
}

/// Compiles plans into the map it borrows, dependencies first.
pub(crate) struct Compiler<'a> {
    plans: &'a mut TypeIdMap<Arc<Plan>>,
    in_progress: Vec<TypeId>,
}

impl<'a> Compiler<'a> {
    #[inline]
    pub fn new(plans: &'a mut TypeIdMap<Arc<Plan>>) -> Self {
        Self {
            plans,
            in_progress: Vec::new(),
        }
    }

    /// Returns the plan of the unwrapped type, compiling it if needed.
    ///
    /// A type whose compilation is in progress has no plan yet; callers look
    /// it up again when the value is written.
    pub fn plan(&mut self, info: &'static TypeInfo) -> Option<Arc<Plan>> {
        let info = unwrap_info(info)?;
        let type_id = info.ty_id();

        if let Some(plan) = self.plans.get(&type_id) {
            return Some(plan.clone());
        }
        if self.in_progress.contains(&type_id) {
            return None;
        }

        log::trace!("compiling plan for `{}`", info.type_path());

        self.in_progress.push(type_id);
        let plan = self.compile(info).map(Arc::new);
        self.in_progress.pop();

        let plan = plan?;
        self.plans.insert(type_id, plan.clone());
        Some(plan)
    }

    fn compile(&mut self, info: &'static TypeInfo) -> Option<Plan> {
        let mut items = Vec::new();
        let mut property_names = Vec::new();

        let shape = match info {
            TypeInfo::Leaf(leaf) => {
                items.push(PlanItem::ValueLeaf { codec: leaf.kind() });
                PlanShape::Leaf(leaf.kind())
            }
            TypeInfo::Struct(info) => {
                items.push(PlanItem::TypeStart);
                for (field, named) in info.iter().enumerate() {
                    property_names.push(named.name());
                    let declared = named.type_info();
                    items.push(match declared {
                        TypeInfo::Leaf(leaf) => PlanItem::PropertyValue {
                            field,
                            codec: leaf.kind(),
                        },
                        _ => PlanItem::PropertyReference {
                            field,
                            declared,
                            hint: self.plan(declared),
                        },
                    });
                }

                let container = info.items().map(|named| named.type_info());
                let shape = self.container_items(container, ItemSource::ItemsField, &mut items);
                if container.is_some() && shape == (false, false) {
                    log::warn!(
                        "items field of `{}` is not a list, array or map and is ignored",
                        info.type_path()
                    );
                }
                PlanShape::Composite {
                    list_like: shape.0,
                    map_like: shape.1,
                }
            }
            TypeInfo::List(_) | TypeInfo::Array(_) | TypeInfo::Map(_) => {
                items.push(PlanItem::TypeStart);
                let (list_like, map_like) = self.container_items(Some(info), ItemSource::Value, &mut items);
                PlanShape::Composite { list_like, map_like }
            }
            TypeInfo::Tuple(info) => {
                let arity = info.field_len();
                items.push(PlanItem::TupleStart { arity: arity as u8 });
                for field in info.iter() {
                    let declared = field.type_info();
                    items.push(PlanItem::RuntimeTypedValue {
                        slot: Slot::Field(field.index()),
                        declared,
                        hint: self.plan(declared),
                    });
                }
                items.push(PlanItem::WriteConstantBytes(Box::new([wire::TUPLE_END])));
                PlanShape::Tuple { arity }
            }
            TypeInfo::Pair(info) => {
                items.push(PlanItem::PairStart);
                for (slot, declared) in [(Slot::Key, info.key().info()), (Slot::Value, info.value().info())] {
                    items.push(PlanItem::RuntimeTypedValue {
                        slot,
                        declared,
                        hint: self.plan(declared),
                    });
                }
                items.push(PlanItem::WriteConstantBytes(Box::new([wire::PAIR_END])));
                PlanShape::Pair
            }
            TypeInfo::Option(_) | TypeInfo::Shared(_) | TypeInfo::Dynamic(_) => return None,
        };

        Some(Plan {
            ty: *info.ty(),
            type_info: info,
            shape,
            property_names: property_names.into_boxed_slice(),
            items: items.into_boxed_slice(),
        })
    }

    /// Pushes the item start and the closing bytes of a composite.
    ///
    /// Returns `(list_like, map_like)`.
    fn container_items(
        &mut self,
        container: Option<&'static TypeInfo>,
        source: ItemSource,
        items: &mut Vec<PlanItem>,
    ) -> (bool, bool) {
        let shape = match container {
            Some(TypeInfo::List(info)) => {
                let element_hint = self.plan(info.item().info());
                items.push(PlanItem::ListStart { source, element_hint });
                (true, false)
            }
            Some(TypeInfo::Array(info)) => {
                let element_hint = self.plan(info.item().info());
                items.push(PlanItem::ListStart { source, element_hint });
                (true, false)
            }
            Some(TypeInfo::Map(info)) => {
                let key_hint = self.plan(info.key().info());
                let value_hint = self.plan(info.value().info());
                items.push(PlanItem::MapStart {
                    source,
                    key_hint,
                    value_hint,
                });
                (false, true)
            }
            _ => (false, false),
        };

        let closing: Box<[u8]> = match shape {
            (true, _) => Box::new([wire::LIST_END, wire::TYPE_END]),
            (_, true) => Box::new([wire::MAP_END, wire::TYPE_END]),
            _ => Box::new([wire::TYPE_END]),
        };
        items.push(PlanItem::WriteConstantBytes(closing));
        shape
    }
}
