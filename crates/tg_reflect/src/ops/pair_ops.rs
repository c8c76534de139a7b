use crate::Reflect;

/// A single key-value pair.
pub trait Pair: Reflect {
    fn key(&self) -> &dyn Reflect;

    fn value(&self) -> &dyn Reflect;
}
