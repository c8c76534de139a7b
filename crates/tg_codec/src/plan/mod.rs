//! Plans: the per-type encoding program run by the serializer.
//!
//! A [`Plan`] is compiled from a type's [`TypeInfo`](tg_reflect::info::TypeInfo)
//! on first use and kept in the process-wide [`PlanCache`]:
//!
//! - leaves become a single [`PlanItem::ValueLeaf`];
//! - structs write a type header, one item per field in declaration order,
//!   then the items of their `#[reflect(items)]` field, if any;
//! - lists, arrays and maps are composites without properties;
//! - tuples and pairs write each slot with its runtime type.
//!
//! Plans of field and element types are attached as hints. A type that is
//! still being compiled (a recursive type) gets no hint and is looked up
//! when a value is written.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod compiler;
mod item;

// -----------------------------------------------------------------------------
// Exports

pub use cache::PlanCache;
pub use item::{ItemSource, Plan, PlanItem, PlanShape, Slot};

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ItemSource, PlanCache, PlanItem, PlanShape};
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use tg_reflect::derive::Reflect;
    use tg_reflect::info::{LeafKind, Typed};
    use tg_reflect::{KeyValue, Shared};

    #[derive(Reflect, Default)]
    #[reflect(type_path = "tests::plan::Person")]
    struct Person {
        first_name: String,
        age: i32,
        brother: Option<Shared<Person>>,
    }

    #[derive(Reflect, Default)]
    #[reflect(type_path = "tests::plan::Team")]
    struct Team {
        name: String,
        #[reflect(items)]
        members: Vec<Person>,
    }

    #[test]
    fn idempotent() {
        let cache = PlanCache::global();
        let a = cache.get(Person::type_info()).unwrap();
        let b = cache.get(Person::type_info()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.contains(TypeId::of::<Person>()));

        // Wrappers share the plan of the inner type.
        let c = cache.get(<Option<Shared<Person>>>::type_info()).unwrap();
        assert!(Arc::ptr_eq(&a, &c));
        assert!(cache.get(<alloc::boxed::Box<dyn tg_reflect::Reflect>>::type_info()).is_none());
    }

    #[test]
    fn struct_items() {
        let plan = PlanCache::global().get(Person::type_info()).unwrap();
        assert_eq!(plan.type_path(), "tests::plan::Person");
        assert_eq!(plan.property_names(), ["first_name", "age", "brother"]);
        assert_eq!(
            plan.shape(),
            PlanShape::Composite {
                list_like: false,
                map_like: false
            }
        );

        let items = plan.items();
        assert_eq!(items.len(), 5);
        assert!(matches!(items[0], PlanItem::TypeStart));
        assert!(matches!(
            items[1],
            PlanItem::PropertyValue {
                field: 0,
                codec: LeafKind::String
            }
        ));
        assert!(matches!(items[2], PlanItem::PropertyValue { field: 1, codec: LeafKind::I32 }));
        // A recursive reference is resolved when the value is written.
        assert!(matches!(items[3], PlanItem::PropertyReference { field: 2, hint: None, .. }));
        assert!(matches!(&items[4], PlanItem::WriteConstantBytes(bytes) if **bytes == [crate::wire::TYPE_END]));
    }

    #[test]
    fn list_like_struct() {
        let plan = PlanCache::global().get(Team::type_info()).unwrap();
        assert_eq!(
            plan.shape(),
            PlanShape::Composite {
                list_like: true,
                map_like: false
            }
        );
        assert_eq!(plan.property_names(), ["name"]);

        let items = plan.items();
        match &items[2] {
            PlanItem::ListStart {
                source,
                element_hint: Some(hint),
            } => {
                assert_eq!(*source, ItemSource::ItemsField);
                assert_eq!(hint.type_path(), "tests::plan::Person");
            }
            other => panic!("unexpected item {other:?}"),
        }
        assert!(matches!(
            &items[3],
            PlanItem::WriteConstantBytes(bytes) if **bytes == [crate::wire::LIST_END, crate::wire::TYPE_END]
        ));
    }

    #[test]
    fn tuples_and_pairs() {
        let plan = PlanCache::global().get(<(i32, String)>::type_info()).unwrap();
        assert_eq!(plan.shape(), PlanShape::Tuple { arity: 2 });
        assert!(matches!(plan.items()[0], PlanItem::TupleStart { arity: 2 }));

        let plan = PlanCache::global()
            .get(<KeyValue<String, Person>>::type_info())
            .unwrap();
        assert_eq!(plan.shape(), PlanShape::Pair);
        match &plan.items()[2] {
            PlanItem::RuntimeTypedValue { hint: Some(hint), .. } => {
                assert_eq!(hint.type_path(), "tests::plan::Person");
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn maps() {
        let plan = PlanCache::global()
            .get(<std::collections::BTreeMap<String, u8>>::type_info())
            .unwrap();
        assert_eq!(
            plan.shape(),
            PlanShape::Composite {
                list_like: false,
                map_like: true
            }
        );
        assert!(plan.property_names().is_empty());
    }
}
