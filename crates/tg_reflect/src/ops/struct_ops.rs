use crate::Reflect;

/// Access to the fields of a struct.
///
/// Tuple structs name their fields `"0"`, `"1"`, ... Field indices follow
/// declaration order and match [`StructInfo`](crate::info::StructInfo).
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect).
///
/// # Examples
///
/// ```
/// use tg_reflect::{derive::Reflect, ops::Struct};
///
/// #[derive(Reflect, Default)]
/// struct Foo {
///     a: i32,
///     b: bool,
/// }
///
/// let foo = Foo { a: 10, b: true };
/// let view: &dyn Struct = &foo;
///
/// assert_eq!(view.field_len(), 2);
/// assert_eq!(view.name_at(1), Some("b"));
/// assert_eq!(view.field("a").and_then(|a| a.downcast_ref::<i32>()), Some(&10));
/// ```
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn name_at(&self, index: usize) -> Option<&str>;

    fn field_len(&self) -> usize;

    /// The `#[reflect(items)]` field, if any.
    #[inline]
    fn items(&self) -> Option<&dyn Reflect> {
        None
    }

    /// The `#[reflect(items)]` field, if any.
    #[inline]
    fn items_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::derive::Reflect;
    use crate::info::{ReflectKind, TypePath, Typed};
    use crate::ops::{ReflectRef, Struct};
    use crate::registry::{TypeRegistry, TypeTraitDefault};
    use crate::{FromReflect, Reflect};

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(type_path = "shop::Order")]
    struct Order {
        id: u64,
        note: String,
        #[reflect(skip)]
        cursor: usize,
        #[reflect(items)]
        lines: Vec<Line>,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Line(u32, f32);

    #[derive(Reflect, Default)]
    struct Wrapper<T> {
        inner: T,
    }

    #[derive(Reflect)]
    #[reflect(default = false)]
    struct Report {
        total: i64,
    }

    #[test]
    fn derived_type_path() {
        assert_eq!(Order::type_path(), "shop::Order");
        assert_eq!(Order::type_name(), "Order");
        assert_eq!(Order::module_path(), Some("shop"));

        assert!(Line::type_path().ends_with("::Line"));
        assert_eq!(Wrapper::<u8>::type_name(), "Wrapper<u8>");
        assert!(Wrapper::<u8>::type_path().ends_with("::Wrapper<u8>"));
    }

    #[test]
    fn derived_struct_info() {
        let info = Order::type_info().as_struct().unwrap();
        assert_eq!(info.field_len(), 2);
        assert_eq!(info.field_at(0).unwrap().name(), "id");
        assert_eq!(info.field_at(1).unwrap().name(), "note");
        assert!(info.field("cursor").is_none());
        assert_eq!(info.items().unwrap().name(), "lines");

        let line = Line::type_info().as_struct().unwrap();
        assert_eq!(line.index_of("1"), Some(1));
    }

    #[test]
    fn derived_field_access() {
        let mut order = Order {
            id: 7,
            note: "fragile".into(),
            cursor: 3,
            lines: Vec::new(),
        };
        assert_eq!(order.reflect_kind(), ReflectKind::Struct);
        assert_eq!(Struct::field_len(&order), 2);

        order.field_mut("id").unwrap().set(9_u64.into_boxed_reflect()).unwrap();
        assert_eq!(order.id, 9);
        assert!(order.field_at(2).is_none());
        assert!(order.items().is_some());

        let ReflectRef::Struct(view) = order.reflect_ref() else {
            panic!("expected a struct view");
        };
        assert_eq!(view.name_at(0), Some("id"));

        let boxed = Line(1, 2.0).into_boxed_reflect();
        assert_eq!(Line::from_reflect(boxed).unwrap(), Line(1, 2.0));
    }

    #[test]
    fn derived_registration() {
        let mut registry = TypeRegistry::new();
        registry.register::<Order>();
        registry.register::<Report>();

        assert!(registry.get_with_type_path("shop::Order").is_some());
        assert!(registry.contains(core::any::TypeId::of::<Line>()));
        assert!(registry.contains(core::any::TypeId::of::<Vec<Line>>()));

        let order = registry.get_type_trait::<TypeTraitDefault>(core::any::TypeId::of::<Order>());
        assert!(order.unwrap().default().is::<Order>());

        let report = registry.get_type_trait::<TypeTraitDefault>(core::any::TypeId::of::<Report>());
        assert!(report.is_none());
        let _ = Report { total: 0 }.total;
    }
}
