//! Persona system: time-dependent example households.
//!
//! A persona is declared as a list of elements (person ids, inputs, targets
//! and a description), each active for a period. Instantiating a persona at
//! a policy date selects the active elements, evaluates the inputs and
//! returns nested input data plus the names of the targets to compute.

pub mod collection;
pub mod compose;
pub mod definition;
pub mod elements;
pub mod linspace;
pub mod period;
pub mod registry;
pub mod validation;

pub use collection::PersonaCollection;
pub use compose::EvalContext;
pub use definition::{ActiveElements, Persona, PersonaDefinition};
pub use elements::{PersonaElement, EVALUATION_DATE, P_ID};
pub use linspace::{LinspaceGrid, LinspaceParameter, LinspaceRange};
pub use period::{parse_date, ActivePeriod};
pub use registry::{ActivePersonas, PersonaListing, PersonaRegistry};
