//! Tracker control step
//!
//! One iteration of the control loop: absorb the receiver time into the
//! clock, evaluate the beacon scheduler, and on a positive decision advance
//! the schedule, build the position report and transmit it as a single
//! framed packet. At most one transmission happens per step.

use core::fmt::Write;
use heapless::String;

use crate::aprs::message::{BeaconConfig, EncodedMessage, MessageError, PositionReport};
use crate::beacon::BeaconScheduler;
use crate::config::gps as gps_config;
use crate::display::StatusScreen;
use crate::gps::{GpsClock, GpsSnapshot};
use crate::lora::framing::{self, SendError};
use crate::lora::traits::LoraRadio;

/// Hardware capabilities resolved at startup.
///
/// Some board variants have no manual-send button; the step ignores the
/// trigger input on those.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackerCapabilities {
    pub manual_trigger: bool,
}

/// Errors from one tracker step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// The position report could not be assembled
    Message(MessageError),
    /// Framing or transmission failed
    Send(SendError),
}

impl From<MessageError> for TrackerError {
    fn from(error: MessageError) -> Self {
        Self::Message(error)
    }
}

impl From<SendError> for TrackerError {
    fn from(error: SendError) -> Self {
        Self::Send(error)
    }
}

/// Result of one control-loop step
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    /// The message text that went on the air, when a beacon was sent
    pub transmitted: Option<EncodedMessage>,
}

impl StepOutcome {
    pub fn beacon_sent(&self) -> bool {
        self.transmitted.is_some()
    }
}

/// Beacon pipeline state: clock, scheduler and station configuration.
pub struct Tracker {
    config: BeaconConfig,
    capabilities: TrackerCapabilities,
    clock: GpsClock,
    scheduler: BeaconScheduler,
    gps_warning_issued: bool,
}

impl Tracker {
    pub fn new(
        config: BeaconConfig,
        capabilities: TrackerCapabilities,
        interval_minutes: u32,
    ) -> Self {
        Self {
            config,
            capabilities,
            clock: GpsClock::new(),
            scheduler: BeaconScheduler::new(interval_minutes),
            gps_warning_issued: false,
        }
    }

    pub fn clock(&self) -> &GpsClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &BeaconScheduler {
        &self.scheduler
    }

    /// Run one control-loop iteration.
    ///
    /// `manual_level` is the sampled manual-send input for this iteration
    /// (`None` on variants without the button). `uptime_ms` drives the
    /// receiver activity watchdog. Ordering within the step is fixed: clock
    /// update, scheduler evaluation, commit gate, schedule advancement,
    /// transmission, display refresh.
    pub async fn step<R: LoraRadio, S: StatusScreen>(
        &mut self,
        snapshot: &GpsSnapshot,
        manual_level: Option<bool>,
        uptime_ms: u64,
        radio: &mut R,
        screen: &mut S,
    ) -> Result<StepOutcome, TrackerError> {
        self.clock.update(snapshot);

        // The manual trigger is only sampled while the fix time is valid,
        // like the schedule itself.
        let manual =
            self.capabilities.manual_trigger && manual_level.unwrap_or(false) && snapshot.time_valid;

        if snapshot.time_valid {
            if let Some(now) = self.clock.now() {
                self.scheduler.evaluate(now, manual);
                if manual {
                    crate::debug!("TX - manual send");
                    screen.show("<< TX >>", &["Manual send"]);
                }
            }
        }

        let mut outcome = StepOutcome::default();
        let location_fresh = snapshot.location_valid && snapshot.location_updated;
        if self.scheduler.should_send(location_fresh) {
            if let Some(now) = self.clock.now() {
                // Advance the schedule first so transmission latency never
                // skews the beacon interval.
                self.scheduler.commit(now);

                let report =
                    PositionReport::new(&self.config, &snapshot.latitude, &snapshot.longitude)?;
                let text = report.encode()?;

                crate::debug!("TX: {}", text.as_str());
                screen.show("<< TX >>", &[text.as_str()]);
                framing::send_frame(radio, text.as_bytes()).await?;

                outcome.transmitted = Some(text);
            }
        }

        if snapshot.time_updated {
            self.show_status(snapshot, screen);
        }

        self.check_receiver_activity(snapshot, uptime_ms, screen);

        Ok(outcome)
    }

    /// Status page refreshed on every time update.
    fn show_status<S: StatusScreen>(&self, snapshot: &GpsSnapshot, screen: &mut S) {
        let mut datetime: String<32> = String::new();
        let _ = write!(
            datetime,
            "{} {}",
            self.clock.format_date(),
            GpsClock::format_time(self.clock.now())
        );

        let mut quality: String<32> = String::new();
        let _ = write!(
            quality,
            "Sats: {} HDOP: {:.1}",
            snapshot.satellites, snapshot.hdop
        );

        let mut next_beacon: String<32> = String::new();
        let _ = write!(
            next_beacon,
            "Nxt Bcn: {}",
            GpsClock::format_time(self.scheduler.state().next_beacon_at())
        );

        screen.show(
            self.config.callsign,
            &[datetime.as_str(), quality.as_str(), next_beacon.as_str()],
        );
    }

    /// Warn once if the receiver has produced almost no bytes after the
    /// startup grace period. Execution continues; the receiver may still
    /// come up later.
    fn check_receiver_activity<S: StatusScreen>(
        &mut self,
        snapshot: &GpsSnapshot,
        uptime_ms: u64,
        screen: &mut S,
    ) {
        if self.gps_warning_issued {
            return;
        }
        if uptime_ms > gps_config::ACTIVITY_GRACE_MS
            && snapshot.receiver_bytes < gps_config::ACTIVITY_MIN_BYTES
        {
            self.gps_warning_issued = true;
            crate::debug!("No GPS detected, check wiring");
            screen.show("WARNING", &["No GPS detected"]);
        }
    }
}
