use crate::notification::NotificationContent;

/// Importance of a notification channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelImportance {
    Low,
    Default,
    High,
}

/// Channel registered once before the first notification is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
    pub show_badge: bool,
}

/// OS notification rendering.
pub trait NotificationSurface: Send + Sync + 'static {
    /// Human-readable application label, used as the default title.
    fn app_label(&self) -> Option<String>;

    /// Registers a notification channel. Repeated registration is harmless.
    fn create_channel(&self, channel: &ChannelSpec);

    /// Shows the notification `id`, replacing any notification with the same id.
    fn show(&self, id: u32, channel_id: &str, content: &NotificationContent);

    /// Withdraws notification `id` if shown.
    fn withdraw(&self, id: u32);
}
