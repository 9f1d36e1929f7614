//! # ChemExtract Domain Models
//!
//! Core domain models for the ChemExtract CAS screening system.
//! All models implement serialization/deserialization with serde; field-shape
//! rules are enforced with the validator crate.
//!
//! ## Key Models
//!
//! - **CasOccurrence**: a distinct CAS number tagged with checksum validity
//! - **ExtractionSummary**: the ordered valid/invalid/all-ordered lists for one document
//! - **DocumentRecord**: the aggregated extraction result for one input document
//! - **CategoryTable** / **CategoryCatalog**: named regulatory lists, loaded once,
//!   read-only for the process lifetime
//! - **LabeledRow** / **ClassificationRow**: fully-labeled intermediate rows and the
//!   legacy first-row-only presentation rows

pub mod classification;
pub mod extraction;

pub use classification::{
    validate_cas_format, CategoryCatalog, CategoryMembership, CategoryTable, ClassificationRow,
    LabeledRow,
};
pub use extraction::{CasOccurrence, DocumentRecord, ExtractionSummary};
