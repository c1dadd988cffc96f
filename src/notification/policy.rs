use crate::hardware::HardwareStatus;

/// Icon of the status notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationIcon {
    Running,
    NotRunning,
}

/// What tapping the notification opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapTarget {
    /// The application's own launch entry point.
    App,
    /// System location settings.
    LocationSettings,
    /// System radio settings.
    RadioSettings,
}

/// User-visible title and body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationText {
    pub title: String,
    pub content: String,
}

/// Fully computed notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationContent {
    pub icon: NotificationIcon,
    pub title: String,
    pub text: String,
    pub tap_target: TapTarget,
    /// Cannot be swiped away.
    pub ongoing: bool,
    /// Dismissed when tapped.
    pub auto_cancel: bool,
}

/// Computes the notification for `hardware`.
///
/// Location is treated as the primary blocking dependency: with both signals
/// off, the tap target points to location settings.
pub fn compute_notification(hardware: HardwareStatus, text: &NotificationText) -> NotificationContent {
    let (icon, tap_target) = match (hardware.radio_enabled, hardware.location_enabled) {
        (true, true) => (NotificationIcon::Running, TapTarget::App),
        (true, false) => (NotificationIcon::NotRunning, TapTarget::LocationSettings),
        (false, true) => (NotificationIcon::NotRunning, TapTarget::RadioSettings),
        (false, false) => (NotificationIcon::NotRunning, TapTarget::LocationSettings),
    };
    NotificationContent {
        icon,
        title: text.title.clone(),
        text: text.content.clone(),
        tap_target,
        ongoing: true,
        auto_cancel: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> NotificationText {
        NotificationText {
            title: "Tracker".into(),
            content: "Tap to open".into(),
        }
    }

    #[test]
    fn both_enabled_opens_app() {
        let n = compute_notification(HardwareStatus::new(true, true), &text());
        assert_eq!(n.icon, NotificationIcon::Running);
        assert_eq!(n.tap_target, TapTarget::App);
        assert_eq!(n.title, "Tracker");
        assert_eq!(n.text, "Tap to open");
    }

    #[test]
    fn radio_off_opens_radio_settings() {
        let n = compute_notification(HardwareStatus::new(false, true), &text());
        assert_eq!(n.icon, NotificationIcon::NotRunning);
        assert_eq!(n.tap_target, TapTarget::RadioSettings);
    }

    #[test]
    fn location_off_opens_location_settings() {
        let n = compute_notification(HardwareStatus::new(true, false), &text());
        assert_eq!(n.tap_target, TapTarget::LocationSettings);
    }

    #[test]
    fn both_off_prefers_location() {
        let n = compute_notification(HardwareStatus::new(false, false), &text());
        assert_eq!(n.icon, NotificationIcon::NotRunning);
        assert_eq!(n.tap_target, TapTarget::LocationSettings);
    }
}
