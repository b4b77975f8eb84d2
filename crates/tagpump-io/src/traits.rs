/// Supplies encoded bytes, one at a time.
///
/// A source owns its own cursor. Returning `None` signals permanent
/// exhaustion: callers must not expect further bytes afterwards.
pub trait Source: Send {
    /// Read the next byte, or `None` once the source is exhausted.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Receives decoded text fragments.
///
/// Writes are fire-and-forget. A sink that can fail reports it through
/// its own API; callers never retry.
pub trait Sink: Send {
    /// Deliver one text fragment.
    fn write(&mut self, text: &str);
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

impl<T: Sink + ?Sized> Sink for Box<T> {
    fn write(&mut self, text: &str) {
        (**self).write(text);
    }
}

/// Collects fragments in arrival order.
impl Sink for Vec<String> {
    fn write(&mut self, text: &str) {
        self.push(text.to_string());
    }
}
