//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls for longer than the configured deadline.  Starvation is fatal and
//! not observable by software.
//!
//! The scheduler owns the handle and calls `feed()` as the last step of
//! every tick, whichever branches ran.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::app::ports::WatchdogPort;

/// Default deadline until [`Watchdog::set_timeout_ms`] is called.
const DEFAULT_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    timeout_ms: u32,
    enabled: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: u64,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Create a disabled watchdog with the default deadline.
    pub fn new() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            enabled: false,
            #[cfg(not(target_os = "espidf"))]
            feeds: 0,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the hardware deadline.  Takes effect immediately if enabled.
    pub fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
        if self.enabled {
            self.reconfigure();
        }
    }

    /// Subscribe the current task to the TWDT.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.reconfigure();

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: subscribes the calling task; called from the main task only.
            let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
            if ret != ESP_OK {
                log::warn!("Watchdog: failed to subscribe ({})", ret);
                return;
            }
        }

        self.enabled = true;
        info!("Watchdog: enabled ({}ms timeout, reset on trigger)", self.timeout_ms);
    }

    /// Unsubscribe the current task.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: the calling task was subscribed in enable().
            let ret = unsafe { esp_task_wdt_delete(core::ptr::null_mut()) };
            if ret != ESP_OK {
                log::warn!("Watchdog: unsubscribe returned {}", ret);
            }
        }

        self.enabled = false;
        info!("Watchdog: disabled");
    }

    /// Number of feeds so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn feed_count(&self) -> u64 {
        self.feeds
    }

    #[cfg(target_os = "espidf")]
    fn reconfigure(&self) {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: self.timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain config struct passed by reference; main task only.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK {
            log::warn!(
                "TWDT reconfigure returned {} (may already be configured)",
                ret
            );
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn reconfigure(&self) {
        log::debug!("Watchdog(sim): timeout {}ms", self.timeout_ms);
    }
}

impl WatchdogPort for Watchdog {
    /// Reset the deadline.
    fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.enabled {
                // SAFETY: the calling task is subscribed while `enabled`.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.feeds += 1;
        }
    }
}
