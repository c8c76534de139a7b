use crate::Reflect;

/// A value that may be absent, i.e. `Option<T>`.
pub trait Nullable: Reflect {
    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn set_none(&mut self);
}
