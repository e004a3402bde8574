use crate::ability::{AbilityDefinition, HeroDefinition};

/// Content-addressable ability and hero lookup, shared read-only between the
/// authoritative engine and background searches.
pub trait CatalogOracle: Send + Sync {
    fn ability(&self, id: &str) -> Option<&AbilityDefinition>;

    fn hero(&self, id: &str) -> Option<&HeroDefinition>;
}

impl<T> CatalogOracle for std::sync::Arc<T>
where
    T: CatalogOracle + ?Sized,
{
    fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        (**self).ability(id)
    }

    fn hero(&self, id: &str) -> Option<&HeroDefinition> {
        (**self).hero(id)
    }
}
