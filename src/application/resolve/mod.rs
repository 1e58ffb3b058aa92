//! Hierarchical resource-path resolution
//!
//! A pipeline is an ordered list of [`Step`]s, each consuming exactly one
//! path segment: parse the segment into the step's typed ID, look the ID
//! up within the entity resolved by the previous step, carry the result
//! forward. The ~20 concrete traversals of the inventory hierarchy are all
//! instantiations of the one algorithm in [`resolve`] over different step
//! sequences — pipelines are data, not hand-written control flow.

mod failure;
mod pipeline;
mod step;

pub use failure::{FailureKind, ResolutionFailure};
pub use pipeline::{
    resolve, Chain, RN, RN_OPERATOR, RN_OPERATOR_BRAND, RN_OPERATOR_GROUP, RN_POOL,
    RN_POOL_STATION, RN_POOL_STATION_EVSE, RN_PROVIDER, RN_RESERVATION, RN_SESSION,
};
pub use step::{EntityKind, ResolvedEntity, Step};
