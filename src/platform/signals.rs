use std::sync::Arc;

/// Platform radio power codes carried by [`RawSignal::RadioState`].
pub mod radio_codes {
    pub const STATE_OFF: i32 = 10;
    pub const STATE_TURNING_ON: i32 = 11;
    pub const STATE_ON: i32 = 12;
    pub const STATE_TURNING_OFF: i32 = 13;
}

/// Raw OS notification, before normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawSignal {
    /// Radio power changed; carries a platform code (see [`radio_codes`]).
    RadioState(i32),
    /// The set of enabled location providers changed; query for the new state.
    LocationProvidersChanged,
}

/// Receiver registered with [`HardwareSignals::subscribe`].
///
/// Invoked on the OS delivery thread.
pub type SignalListener = Arc<dyn Fn(RawSignal) + Send + Sync>;

/// Registration token returned by [`HardwareSignals::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignalSubscription(pub u64);

/// OS source of radio and location state notifications.
pub trait HardwareSignals: Send + Sync + 'static {
    /// Registers `listener` for both signals.
    fn subscribe(&self, listener: SignalListener) -> SignalSubscription;

    /// Removes a registration. Unknown tokens are ignored.
    fn unsubscribe(&self, subscription: SignalSubscription);

    /// Current radio power state.
    fn radio_enabled(&self) -> bool;

    /// Current availability of the precise location provider.
    fn location_enabled(&self) -> bool;
}
