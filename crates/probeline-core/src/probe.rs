//! Probe adapter boundary
//!
//! A probe turns a locator into structured metadata. It must not touch the
//! store; the ingestion loop decides what gets recorded.

use crate::error::ProbeError;
use crate::model::Metadata;

pub trait Probe {
    fn probe(&self, locator: &str) -> Result<Metadata, ProbeError>;
}

impl<F> Probe for F
where
    F: Fn(&str) -> Result<Metadata, ProbeError>,
{
    fn probe(&self, locator: &str) -> Result<Metadata, ProbeError> {
        self(locator)
    }
}
