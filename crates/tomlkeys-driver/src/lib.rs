#![doc = include_str!("../README.md")]
//! Semantic construction of TOML key trees.
//!
//! A grammar front end reports productions as [`Event`]s; the [`Driver`]
//! assembles them into [`Key`](tomlkeys_tree::Key)s and hands the finished
//! keys to a [`KeySink`]. The convenience functions [`parse`], [`read`] and
//! [`read_file`] wrap the driver for the common cases.

use std::path::Path;

use tomlkeys_tree::{KeySet, KeySink};
use tracing::debug;

mod arena;
mod comments;
mod cursor;
mod diagnostic;
mod driver;
mod error;
mod event;
mod options;
mod table_array;

pub use driver::Driver;
pub use error::{Error, ErrorKind};
pub use event::Event;
pub use options::Options;

/// Receiver of grammar events.
pub trait Callback {
    /// Handle one event. An `Err` means the parse failed; the caller should
    /// stop feeding events.
    fn event(&mut self, event: Event) -> Result<(), Error>;
}

/// A grammar front end.
pub trait Grammar {
    /// Recognize `source`, reporting every production to `callback` in
    /// document order. Returns the first error `callback` returned.
    fn parse(&mut self, source: &str, callback: &mut dyn Callback) -> Result<(), Error>;
}

/// Feed `events` to `callback`, stopping at the first error.
pub fn drive<I>(events: I, callback: &mut dyn Callback) -> Result<(), Error>
where
    I: IntoIterator<Item = Event>,
{
    for event in events {
        callback.event(event)?;
    }
    Ok(())
}

/// Build a fresh [`KeySet`] from `events`.
pub fn parse<I>(options: Options, events: I) -> Result<KeySet, Error>
where
    I: IntoIterator<Item = Event>,
{
    let mut driver = Driver::new(options, KeySet::new());
    // the driver keeps the error; `finish` returns it
    let _ = drive(events, &mut driver);
    driver.finish()
}

/// Add the keys built from `events` to `sink`.
///
/// Either every key is added or, on error, none is.
pub fn read<S, I>(options: Options, events: I, sink: &mut S) -> Result<(), Error>
where
    S: KeySink + ?Sized,
    I: IntoIterator<Item = Event>,
{
    let staged = parse(options, events)?;
    debug!(keys = staged.len(), "merging parsed keys");
    staged.merge_into(sink);
    Ok(())
}

/// Read the file at `path`, run `grammar` over it and add the resulting
/// keys to `sink`.
///
/// Either every key is added or, on error, none is.
pub fn read_file<G, S>(
    path: impl AsRef<Path>,
    options: Options,
    grammar: &mut G,
    sink: &mut S,
) -> Result<(), Error>
where
    G: Grammar + ?Sized,
    S: KeySink + ?Sized,
{
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|err| Error::resource(format!("Could not read '{}': {err}", path.display())))?;
    let options = match options.filename {
        Some(_) => options,
        None => options.with_filename(path.display().to_string()),
    };
    debug!(path = %path.display(), bytes = source.len(), "parsing file");

    let mut driver = Driver::new(options, KeySet::new());
    let outcome = grammar.parse(&source, &mut driver);
    let staged = driver.finish()?;
    outcome?;
    staged.merge_into(sink);
    Ok(())
}
