use std::any::Any;
use std::fmt;

/// Anything that can travel through a mailbox as message content.
///
/// Mirrors riker's `Message` blanket trait, minus the `Clone` bound: this
/// runtime never needs to replay or duplicate a payload, only move it once
/// from sender to handler.
pub trait Message: fmt::Debug + Send + 'static {}
impl<T: fmt::Debug + Send + 'static> Message for T {}

/// A type-erased message value, analogous to riker's `AnyMessage`.
pub struct Payload(Box<dyn Any + Send>);

impl Payload {
    pub fn new<T: Message>(msg: T) -> Self {
        Payload(Box::new(msg))
    }

    /// Downcast to the expected concrete type, consuming the payload.
    ///
    /// Returns the payload itself (so the caller can try another type or
    /// fall through to an "unhandled" branch) when the downcast fails.
    pub fn downcast<T: Message>(self) -> Result<T, Payload> {
        match self.0.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(any) => Err(Payload(any)),
        }
    }

    pub fn is<T: Message>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}
