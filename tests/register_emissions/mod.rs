use std::sync::{Arc, Mutex};

use pipe::Subscriber;

/// Returns ten subscriber factories that all record into the same `nexts` register.
pub fn register_emissions_subscriber() -> (Vec<impl FnOnce() -> Subscriber<i32>>, Arc<Mutex<Vec<i32>>>)
{
    let nexts: Vec<i32> = Vec::with_capacity(5);
    let nexts = Arc::new(Mutex::new(nexts));
    let nexts_c = Arc::clone(&nexts);

    let make_subscriber = vec![
        move || {
            Subscriber::new(move |n| {
                // Track on_value() calls.
                nexts_c.lock().unwrap().push(n);
            })
        };
        10
    ];
    (make_subscriber, nexts)
}
