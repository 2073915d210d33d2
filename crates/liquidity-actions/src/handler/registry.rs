use {
    super::{
        Handler,
        composable_stable::ComposableStable,
        gyro::Gyro,
        nested::Nested,
        weighted::Weighted,
    },
    crate::{domain::PoolType, error::Error},
    std::{collections::HashMap, fmt, sync::Arc},
};

/// Maps pool types to the handler encoding their operations.
#[derive(Clone)]
pub struct Registry {
    handlers: HashMap<PoolType, Arc<dyn Handler>>,
}

impl Registry {
    /// A registry without any handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler, replacing any previous handler of the pool type.
    pub fn with_handler(mut self, pool_type: PoolType, handler: Arc<dyn Handler>) -> Self {
        self.handlers.insert(pool_type, handler);
        self
    }

    pub fn resolve(&self, pool_type: &PoolType) -> Result<Arc<dyn Handler>, Error> {
        self.handlers
            .get(pool_type)
            .cloned()
            .ok_or_else(|| Error::UnsupportedPoolType(pool_type.clone()))
    }

    pub fn pool_types(&self) -> impl Iterator<Item = &PoolType> {
        self.handlers.keys()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let gyro: Arc<dyn Handler> = Arc::new(Gyro);
        Self::empty()
            .with_handler(PoolType::Weighted, Arc::new(Weighted))
            .with_handler(PoolType::ComposableStable, Arc::new(ComposableStable))
            .with_handler(PoolType::Gyro2, gyro.clone())
            .with_handler(PoolType::Gyro3, gyro.clone())
            .with_handler(PoolType::GyroE, gyro)
            .with_handler(PoolType::Linear, Arc::new(Nested::linear()))
            .with_handler(PoolType::Boosted, Arc::new(Nested::boosted()))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pool_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
