//! Streams search results into a console-backed image search view.
//!
//! Run with `RUST_LOG=pipe=trace` to see subscription activity.

use std::sync::{Arc, Mutex};

use pipe::{
    image_search::{ImageSearchView, Item, Listener, NoopListener, State},
    Disposable, Pipe, Source, Subscribeable, Subscriber,
};

struct ConsoleView {
    listener: Box<dyn Listener + Send>,
}

impl ImageSearchView for ConsoleView {
    fn set_listener(&mut self, listener: Box<dyn Listener + Send>) {
        self.listener = listener;
    }

    fn update_state(&mut self, state: State) {
        println!("View state: {state}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let results = Source::new();
    let pipe = Pipe::from_source(&results);

    let view = Arc::new(Mutex::new(ConsoleView {
        listener: Box::new(NoopListener),
    }));
    view.lock().unwrap().set_listener(Box::new(NoopListener));
    view.lock().unwrap().update_state(State::default());
    view.lock().unwrap().listener.on_query_updated("cats");

    // Collect images as they arrive and show a loading row while more are on the way.
    let view_c = Arc::clone(&view);
    let mut images = Vec::new();
    let mut subscription = pipe.subscribe(Subscriber::new(move |item: Item| {
        let mut view = view_c.lock().unwrap();
        match item {
            Item::Loading => {
                let mut items = images.clone();
                items.push(Item::Loading);
                view.update_state(State::LoadedResults {
                    items,
                    more_pages_available: true,
                });
            }
            image @ Item::Image { .. } => {
                images.push(image);
                view.update_state(State::LoadedResults {
                    items: images.clone(),
                    more_pages_available: false,
                });
            }
        }
    }));

    results.push(Item::image("https://images.example.com/cat-1.jpg"));
    results.push(Item::Loading);
    results.push(Item::image("https://images.example.com/cat-2.jpg"));

    subscription.dispose();

    // Not delivered, the view is no longer subscribed.
    results.push(Item::image("https://images.example.com/cat-3.jpg"));

    view.lock().unwrap().listener.request_more_results();
    println!("Observers left: {}", results.len());
}
