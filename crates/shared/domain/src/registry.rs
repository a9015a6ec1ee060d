//! Type-erased container for initialized feature slices.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Feature state shared across request handlers.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Stable slice key, also used as the migration namespace.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: state.name(), state: Box::new(state) }
    }

    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}
