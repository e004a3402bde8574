//! Read-only world data consumed by the engine.
//!
//! The [`CatalogOracle`] exposes ability and hero definitions; the
//! [`MapDescriptor`] describes the static board. [`Env`] bundles the catalog
//! with the [`GameConfig`] so every engine entry point receives its
//! dependencies explicitly instead of through ambient globals.
mod catalog;
mod error;
mod map;

pub use catalog::CatalogOracle;
pub use error::{CatalogError, OracleError};
pub use map::{Block, MapDescriptor, MapDimensions, MapError, TerrainKind};

use crate::ability::{AbilityCategory, AbilityDefinition, HeroDefinition};
use crate::config::GameConfig;
use crate::state::Unit;

/// Aggregates the read-only collaborators required by the engine.
pub struct Env<'a, C>
where
    C: CatalogOracle + ?Sized,
{
    catalog: &'a C,
    config: &'a GameConfig,
}

pub type GameEnv<'a> = Env<'a, dyn CatalogOracle + 'a>;

impl<C> Clone for Env<'_, C>
where
    C: CatalogOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Env<'_, C> where C: CatalogOracle + ?Sized {}

impl<C> core::fmt::Debug for Env<'_, C>
where
    C: CatalogOracle + ?Sized,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, C> Env<'a, C>
where
    C: CatalogOracle + ?Sized,
{
    pub fn new(catalog: &'a C, config: &'a GameConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Looks up an ability definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::AbilityNotFound` for unknown ids.
    pub fn ability(&self, id: &str) -> Result<&'a AbilityDefinition, OracleError> {
        self.catalog
            .ability(id)
            .ok_or_else(|| OracleError::AbilityNotFound(id.to_owned()))
    }

    /// Looks up a hero definition.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::HeroNotFound` for unknown ids.
    pub fn hero(&self, id: &str) -> Result<&'a HeroDefinition, OracleError> {
        self.catalog
            .hero(id)
            .ok_or_else(|| OracleError::HeroNotFound(id.to_owned()))
    }

    /// Abilities whose effects apply to `unit`: equipped skills in slot
    /// order, then positive statuses, then negative statuses.
    pub fn effect_sources<'u>(
        &self,
        unit: &'u Unit,
    ) -> impl Iterator<Item = Result<&'a AbilityDefinition, OracleError>> + 'u
    where
        'a: 'u,
    {
        let env = *self;
        unit.skills
            .iter()
            .chain(unit.bonuses.iter())
            .chain(unit.penalties.iter())
            .map(move |id| env.ability(id.as_str()))
    }

    /// The ability `unit` has equipped in `category`, if any.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::AbilityNotFound` if an equipped id is unknown.
    pub fn equipped(
        &self,
        unit: &Unit,
        category: AbilityCategory,
    ) -> Result<Option<&'a AbilityDefinition>, OracleError> {
        for id in &unit.skills {
            let ability = self.ability(id.as_str())?;
            if ability.category() == category {
                return Ok(Some(ability));
            }
        }
        Ok(None)
    }
}

impl<'a, C> Env<'a, C>
where
    C: CatalogOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let catalog: &'a dyn CatalogOracle = self.catalog;
        Env::new(catalog, self.config)
    }
}
