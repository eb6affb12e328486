//! View-layer contracts of a screen that lets the user search for images and
//! shows the results.
//!
//! The data layer pushes [`Item`]s as they arrive; the presentation layer turns
//! them into a [`State`] and hands it to an [`ImageSearchView`]. Rendering is up
//! to the view implementation.

use std::fmt;

/// Allows the user to search for images and shows the result.
pub trait ImageSearchView {
    /// Assigns the listener notified about user interaction.
    fn set_listener(&mut self, listener: Box<dyn Listener + Send>);

    /// Updates the state of the view. A fresh view is in [`State::Default`].
    fn update_state(&mut self, state: State);
}

/// Notified about the user's interaction with the view.
pub trait Listener {
    /// Called when the user would like to see more results for the same query.
    fn request_more_results(&mut self);

    /// Called when the user changes the search query.
    fn on_query_updated(&mut self, query: &str);
}

/// A [`Listener`] that ignores every notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopListener;

impl Listener for NoopListener {
    fn request_more_results(&mut self) {}

    fn on_query_updated(&mut self, _: &str) {}
}

/// An entry that can be presented in the results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    /// An image stored on a remote server.
    Image { url: String },
    /// More results are being loaded at the moment.
    Loading,
}

impl Item {
    /// Shorthand for [`Item::Image`] at `url`.
    pub fn image(url: impl Into<String>) -> Self {
        Item::Image { url: url.into() }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Image { url } => write!(f, "Image{{url='{url}'}}"),
            Item::Loading => f.write_str("Loading"),
        }
    }
}

/// The state the view is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum State {
    /// The user did not attempt to search for anything.
    #[default]
    Default,
    /// Something is being loaded.
    Loading,
    /// The user searched but nothing was found.
    NoResults,
    /// Something went wrong and results can't be loaded.
    Failure,
    /// The user searched and something was found.
    LoadedResults {
        items: Vec<Item>,
        more_pages_available: bool,
    },
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Default => f.write_str("Default"),
            State::Loading => f.write_str("Loading"),
            State::NoResults => f.write_str("NoResults"),
            State::Failure => f.write_str("Failure"),
            State::LoadedResults {
                items,
                more_pages_available,
            } => {
                f.write_str("LoadedResults{items=[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "], morePagesAvailable={more_pages_available}}}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Pipe, Source, Tester};

    #[test]
    fn default_state() {
        assert_eq!(State::default(), State::Default);
    }

    #[test]
    fn loaded_results_equality() {
        let a = State::LoadedResults {
            items: vec![Item::image("a"), Item::Loading],
            more_pages_available: true,
        };
        let b = State::LoadedResults {
            items: vec![Item::image("a"), Item::Loading],
            more_pages_available: true,
        };
        let c = State::LoadedResults {
            items: vec![Item::image("a"), Item::Loading],
            more_pages_available: false,
        };

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Item::image("http://x/1.png").to_string(), "Image{url='http://x/1.png'}");
        assert_eq!(Item::Loading.to_string(), "Loading");
        assert_eq!(State::NoResults.to_string(), "NoResults");
        assert_eq!(
            State::LoadedResults {
                items: vec![Item::image("u"), Item::Loading],
                more_pages_available: false,
            }
            .to_string(),
            "LoadedResults{items=[Image{url='u'}, Loading], morePagesAvailable=false}"
        );
    }

    #[test]
    fn noop_listener_accepts_notifications() {
        let mut listener: Box<dyn Listener> = Box::new(NoopListener);
        listener.request_more_results();
        listener.on_query_updated("cats");
    }

    #[test]
    fn items_stream_through_pipe() {
        let source = Source::new();
        let tester = Tester::test(&Pipe::from_source(&source));

        source.push(Item::image("a"));
        source.push(Item::Loading);

        tester.assert_values(&[Item::image("a"), Item::Loading]);
    }
}
