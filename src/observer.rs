/// The capability consumed by a [`Pipe`] or [`Source`]: a single callback invoked
/// synchronously for every value pushed while the observer is subscribed.
///
/// [`Pipe`]: crate::Pipe
/// [`Source`]: crate::Source
pub trait Observer<T> {
    fn on_value(&mut self, value: T);
}
