use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    core::NotificationConfig,
    events::{Bus, Event, EventKind},
    hardware::HardwareMonitor,
    platform::{ChannelImportance, ChannelSpec, NotificationSurface},
    prefs::{PreferenceStore, ServiceConfig},
};

use super::policy::{NotificationText, compute_notification};

/// Renders or withdraws the persistent notification.
///
/// ### Rules
/// - Always uses the single configured id: repeated renders update in place.
/// - Foreground flag `false` → withdraw, never render.
/// - Hardware status is read from the monitor's atomic cell.
pub struct NotificationPolicy {
    cfg: NotificationConfig,
    surface: Arc<dyn NotificationSurface>,
    prefs: Arc<dyn PreferenceStore>,
    hardware: Arc<HardwareMonitor>,
    text: Mutex<NotificationText>,
    bus: Bus,
}

impl NotificationPolicy {
    /// Registers the notification channel and seeds the text from the app label.
    pub fn new(
        cfg: NotificationConfig,
        surface: Arc<dyn NotificationSurface>,
        prefs: Arc<dyn PreferenceStore>,
        hardware: Arc<HardwareMonitor>,
        bus: Bus,
    ) -> Self {
        surface.create_channel(&ChannelSpec {
            id: cfg.channel_id.clone(),
            name: cfg.channel_name.clone(),
            importance: ChannelImportance::Low,
            show_badge: false,
        });
        let title = surface
            .app_label()
            .unwrap_or_else(|| cfg.default_title.clone());
        let text = NotificationText {
            title,
            content: cfg.default_content.clone(),
        };
        Self {
            cfg,
            surface,
            prefs,
            hardware,
            text: Mutex::new(text),
            bus,
        }
    }

    /// Current title and body.
    pub fn text(&self) -> NotificationText {
        self.text.lock().clone()
    }

    /// Replaces title and body, then re-renders.
    pub fn set_text(&self, title: impl Into<String>, content: impl Into<String>) -> bool {
        *self.text.lock() = NotificationText {
            title: title.into(),
            content: content.into(),
        };
        self.refresh()
    }

    /// Renders (foreground mode) or withdraws the notification.
    ///
    /// Returns `true` if the notification is now shown.
    pub fn refresh(&self) -> bool {
        let foreground = ServiceConfig::load(self.prefs.as_ref()).is_foreground;
        if !foreground {
            self.withdraw();
            return false;
        }

        let hardware = self.hardware.current();
        let content = compute_notification(hardware, &self.text.lock());
        self.surface
            .show(self.cfg.id, &self.cfg.channel_id, &content);
        self.bus.publish(
            Event::new(EventKind::NotificationShown)
                .with_hardware(hardware)
                .with_reason(format!("{:?}", content.tap_target)),
        );
        true
    }

    /// Withdraws the notification regardless of mode.
    pub fn withdraw(&self) {
        self.surface.withdraw(self.cfg.id);
        self.bus.publish(Event::new(EventKind::NotificationWithdrawn));
    }
}
