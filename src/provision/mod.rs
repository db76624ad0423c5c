//! The provisioning pipeline and its run report.
//!
//! [`Provisioner`] runs the steps in order. Fatal conditions end the run
//! with a [`ProvisionError`](crate::error::ProvisionError); everything else
//! becomes an [`Advisory`] in the final [`Summary`].

pub mod executor;
pub mod pipeline;
pub mod report;

pub use executor::Executor;
pub use pipeline::Provisioner;
pub use report::{render_summary, Advisories, Advisory, Step, Summary};
