//! Card system: identities, templates, and the catalog.
//!
//! ## Key Types
//!
//! - `CardKey`: The `Set_Rarity_Name` card string
//! - `CardType`, `Element`, `Stat`, `TargetMode`: Closed card vocabularies
//! - `CardTemplate`: A catalog entry as written, possibly inheriting
//! - `CardData`: A resolved card with defaults filled in
//! - `CardCatalog`: Template storage and inheritance resolution
//!
//! ## Card Instances
//!
//! A card held by a combatant is just its `CardKey` sitting in one zone.
//! Copies carry no identity of their own and are told apart only by
//! position.

pub mod attributes;
pub mod definition;
pub mod key;
pub mod registry;

pub use attributes::{CardType, Element, Stat, TargetMode};
pub use definition::{CardData, CardTemplate};
pub use key::CardKey;
pub use registry::CardCatalog;
