//! In-page interaction instrumentation: observes handler registrations and
//! navigation/network/timer calls against an in-memory document, derives
//! stable structural addresses for the involved elements, and appends
//! normalized, serializable records to a session catalog for downstream
//! consumers (UI-test generation, crawler replay).

use std::rc::Rc;

use crate::catalog::catalog::Catalog;
use crate::dom::document::Document;
use crate::identity::digest::Sha1Digest;
use crate::intercept::page::Page;
use crate::session::probe::{ProbeConfig, ProbeSession};
use crate::session::script::{CallScript, replay};

pub mod catalog;
pub mod cli;
pub mod dom;
pub mod identity;
pub mod intercept;
pub mod session;
pub mod trace;

/// Instrument a document, replay a call script against it, and return the
/// exported catalog. Every wrap is removed again before returning.
pub fn trace_catalog(
    document: Document,
    script: &CallScript,
    config: &ProbeConfig,
) -> Result<Catalog, Box<dyn std::error::Error>> {
    let mut page = Page::new(document);
    let session = ProbeSession::install(&mut page, config, Rc::new(Sha1Digest))?;

    let replay_result = replay(&mut page, script);

    let catalog = session.export();
    session.uninstall(&mut page)?;
    replay_result?;

    Ok(catalog)
}
