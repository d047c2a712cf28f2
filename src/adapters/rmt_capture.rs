//! RMT receive adapter for the [`PulseCapture`] port.
//!
//! - **`target_os = "espidf"`**: drives the legacy RMT RX driver.  The
//!   driver fills a FreeRTOS ring buffer with 32-bit items; each received
//!   buffer is viewed in place as `&[Sample]` and handed back with
//!   `vRingbufferReturnItem` once read.
//! - **`not(target_os = "espidf")`**: in-memory simulation.  Bench code
//!   injects batches with [`RmtCapture::inject`]; `receive` pops them in
//!   FIFO order.

#[cfg(not(target_os = "espidf"))]
use crate::config::DEFAULT_RING_BUFFER_BYTES;
use crate::error::CaptureError;
use crate::ports::{CaptureSettings, PulseCapture, Sample};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::{info, warn};

/// Bytes per RMT item.
const ITEM_BYTES: usize = core::mem::size_of::<Sample>();

/// One batch fills at most a default-sized ring buffer (250 items).
#[cfg(not(target_os = "espidf"))]
const SIM_BATCH_CAP: usize = DEFAULT_RING_BUFFER_BYTES as usize / ITEM_BYTES;
#[cfg(not(target_os = "espidf"))]
const SIM_QUEUE_DEPTH: usize = 8;

#[cfg(not(target_os = "espidf"))]
type SimBatch = heapless::Vec<Sample, SIM_BATCH_CAP>;

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct RmtCapture {
    channel: Option<rmt_channel_t>,
    ring: RingbufHandle_t,
    pending: *mut core::ffi::c_void,
}

#[cfg(target_os = "espidf")]
impl RmtCapture {
    pub fn new() -> Self {
        Self {
            channel: None,
            ring: core::ptr::null_mut(),
            pending: core::ptr::null_mut(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl PulseCapture for RmtCapture {
    fn start(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError> {
        if self.channel.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }
        let channel = settings.channel as rmt_channel_t;

        let mut cfg = rmt_config_t {
            rmt_mode: rmt_mode_t_RMT_MODE_RX,
            channel,
            gpio_num: settings.gpio,
            clk_div: settings.clk_div,
            mem_block_num: 1,
            flags: 0,
            ..Default::default()
        };
        cfg.__bindgen_anon_1.rx_config = rmt_rx_config_t {
            idle_threshold: settings.idle_threshold_ticks,
            filter_ticks_thresh: settings.filter_ticks,
            filter_en: true,
            ..Default::default()
        };

        // SAFETY: single-threaded bring-up from the main task; `cfg` outlives
        // the call and the channel is not installed (checked above).
        unsafe {
            let ret = rmt_config(&cfg);
            if ret != ESP_OK as esp_err_t {
                return Err(CaptureError::ConfigFailed(ret));
            }
            let ret = rmt_driver_install(channel, settings.ring_buffer_bytes as usize, 0);
            if ret != ESP_OK as esp_err_t {
                return Err(CaptureError::InstallFailed(ret));
            }

            let mut ring: RingbufHandle_t = core::ptr::null_mut();
            let ret = rmt_get_ringbuf_handle(channel, &mut ring);
            if ret != ESP_OK as esp_err_t || ring.is_null() {
                rmt_driver_uninstall(channel);
                return Err(CaptureError::RingBufferUnavailable(ret));
            }

            let ret = rmt_rx_start(channel, true);
            if ret != ESP_OK as esp_err_t {
                rmt_driver_uninstall(channel);
                return Err(CaptureError::StartFailed(ret));
            }
            self.ring = ring;
        }

        self.channel = Some(channel);
        info!("rmt: rx started on ch{} (GPIO{})", settings.channel, settings.gpio);
        Ok(())
    }

    fn receive(&mut self) -> Option<&[Sample]> {
        if self.channel.is_none() || !self.pending.is_null() {
            return None;
        }
        let mut length: usize = 0;
        // SAFETY: `ring` is the live handle of the installed driver; zero
        // ticks timeout makes this a non-blocking poll.
        let item = unsafe { xRingbufferReceive(self.ring, &mut length, 0) };
        if item.is_null() {
            return None;
        }
        self.pending = item;
        // SAFETY: the driver stores whole `rmt_item32_t`s, which share
        // `Sample`'s transparent u32 layout.  The buffer stays valid until
        // `return_batch` hands it back, and `&mut self` is held until then.
        Some(unsafe { core::slice::from_raw_parts(item as *const Sample, length / ITEM_BYTES) })
    }

    fn return_batch(&mut self) {
        if self.pending.is_null() {
            return;
        }
        // SAFETY: `pending` came from `xRingbufferReceive` on this handle
        // and has not been returned yet.
        unsafe { vRingbufferReturnItem(self.ring, self.pending) };
        self.pending = core::ptr::null_mut();
    }

    fn release(&mut self) {
        self.return_batch();
        if let Some(channel) = self.channel.take() {
            // SAFETY: the channel was installed by `start`; uninstalling
            // also frees the ring buffer, so drop our handle first.
            self.ring = core::ptr::null_mut();
            let ret = unsafe { rmt_driver_uninstall(channel) };
            if ret == ESP_OK as esp_err_t {
                info!("rmt: ch{} released", channel);
            } else {
                warn!("rmt: uninstall ch{} returned {}", channel, ret);
            }
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct RmtCapture {
    settings: Option<CaptureSettings>,
    queue: heapless::Deque<SimBatch, SIM_QUEUE_DEPTH>,
    pending: Option<SimBatch>,
}

#[cfg(not(target_os = "espidf"))]
impl RmtCapture {
    pub fn new() -> Self {
        Self {
            settings: None,
            queue: heapless::Deque::new(),
            pending: None,
        }
    }

    /// Queue one batch as if the peripheral had captured it.  Returns
    /// `false` (batch dropped) when not running, when the batch exceeds
    /// the session's ring buffer or 250 items, or when the
    /// queue is full.
    pub fn inject(&mut self, samples: &[Sample]) -> bool {
        let Some(settings) = self.settings else {
            return false;
        };
        if samples.len() * ITEM_BYTES > settings.ring_buffer_bytes as usize {
            return false;
        }
        let Ok(batch) = SimBatch::from_slice(samples) else {
            return false;
        };
        self.queue.push_back(batch).is_ok()
    }

    /// Settings of the running session, if any.
    pub fn settings(&self) -> Option<&CaptureSettings> {
        self.settings.as_ref()
    }

    pub fn pending_batches(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(not(target_os = "espidf"))]
impl PulseCapture for RmtCapture {
    fn start(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError> {
        if self.settings.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }
        self.settings = Some(*settings);
        log::info!("rmt(sim): rx started on ch{} (GPIO{})", settings.channel, settings.gpio);
        Ok(())
    }

    fn receive(&mut self) -> Option<&[Sample]> {
        if self.settings.is_none() || self.pending.is_some() {
            return None;
        }
        self.pending = Some(self.queue.pop_front()?);
        self.pending.as_deref()
    }

    fn return_batch(&mut self) {
        self.pending = None;
    }

    fn release(&mut self) {
        if self.settings.take().is_some() {
            self.pending = None;
            self.queue.clear();
            log::info!("rmt(sim): released");
        }
    }
}

impl Default for RmtCapture {
    fn default() -> Self {
        Self::new()
    }
}
