//! Business rules on top of the query layer

pub mod badges;
pub mod deposits;
pub mod games;
pub mod ledger;
pub mod payments;
pub mod roster;
pub mod settlement;
pub mod streak;
