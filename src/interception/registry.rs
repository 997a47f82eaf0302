//! Named interceptor factories.
//!
//! Routes bound with `interceptor = { kind = "named", id = "..." }` get a fresh
//! interceptor from the factory registered under that id each time they are shown.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::interception::gate::Interceptor;

pub type InterceptorFactory = Arc<dyn Fn() -> Arc<dyn Interceptor> + Send + Sync>;

#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    factories: HashMap<String, InterceptorFactory>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. A later registration under the same id replaces it.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Interceptor> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    pub fn create(&self, id: &str) -> Option<Arc<dyn Interceptor>> {
        self.factories.get(id).map(|factory| factory())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("InterceptorRegistry").field("ids", &ids).finish()
    }
}
