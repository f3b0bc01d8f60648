// Countdown timer
//
// An owned, tick-driven clock. The timer never spawns anything: while running
// it holds the deadline of its next tick, and whoever owns it awaits
// `wait_for_tick()` (or `next_tick()`) and applies the tick. This keeps every
// state change on the owner's event loop, one handler at a time.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Length of one tick in production use.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Observer invoked by the timer. Receives the state after the tick was applied.
pub type TimerCallback = Box<dyn FnMut(&TimerState) + Send>;

/// Format whole seconds as `MM:SS`.
///
/// Minutes are not clamped, so 100 minutes renders as `100:00`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Observable state of a [`CountdownTimer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    remaining: u32,
    running: bool,
    display: String,
}

impl TimerState {
    fn new(remaining: u32) -> Self {
        Self {
            remaining,
            running: false,
            display: format_clock(remaining),
        }
    }

    /// Whole seconds left on the clock.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn display(&self) -> &str {
        &self.display
    }

    fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
        self.display = format_clock(remaining);
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,

    /// One second elapsed and time remains.
    Ticked { remaining: u32 },

    /// The last second elapsed; the timer stopped and the expire callback ran.
    Expired,
}

/// Countdown clock with start/stop/reset and tick/expire observers.
///
/// All operations are total. Starting a running timer, stopping a stopped one,
/// or ticking while stopped are no-ops rather than errors.
pub struct CountdownTimer {
    state: TimerState,
    period: Duration,
    next_deadline: Option<Instant>,
    on_tick: Option<TimerCallback>,
    on_expire: Option<TimerCallback>,
}

impl CountdownTimer {
    /// Create a stopped timer holding `duration_seconds`.
    pub fn new(duration_seconds: u32) -> Self {
        Self::with_period(duration_seconds, DEFAULT_TICK_PERIOD)
    }

    /// Create a stopped timer whose ticks are `period` apart.
    pub fn with_period(duration_seconds: u32, period: Duration) -> Self {
        Self {
            state: TimerState::new(duration_seconds),
            period,
            next_deadline: None,
            on_tick: None,
            on_expire: None,
        }
    }

    /// Set the clock to `duration_seconds` and clear any run in progress.
    ///
    /// Scheduled ticks and registered callbacks are dropped without being invoked.
    pub fn reset(&mut self, duration_seconds: u32) {
        self.next_deadline = None;
        self.on_tick = None;
        self.on_expire = None;
        self.state = TimerState::new(duration_seconds);
        tracing::trace!("Timer reset to {}", self.state.display);
    }

    /// Begin counting down, one tick per period.
    ///
    /// No-op while already running (the existing callbacks and remaining time
    /// are kept) and when there is no time left to count down.
    pub fn start<T, E>(&mut self, on_tick: T, on_expire: E)
    where
        T: FnMut(&TimerState) + Send + 'static,
        E: FnMut(&TimerState) + Send + 'static,
    {
        if self.state.running {
            tracing::debug!("Timer already running, start ignored");
            return;
        }

        if self.state.remaining == 0 {
            tracing::debug!("Timer has no time left, start ignored");
            return;
        }

        self.on_tick = Some(Box::new(on_tick));
        self.on_expire = Some(Box::new(on_expire));
        self.state.running = true;
        self.next_deadline = Some(Instant::now() + self.period);

        tracing::debug!("Timer started at {}", self.state.display);
    }

    /// Cancel the recurring tick. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.state.running {
            return;
        }

        self.state.running = false;
        self.next_deadline = None;
        tracing::debug!("Timer stopped at {}", self.state.display);
    }

    /// Apply one tick now.
    ///
    /// Decrements the clock, invokes the tick callback, and on reaching zero
    /// stops the timer before invoking the expire callback. The expire callback
    /// therefore always observes `is_running() == false`, and runs at most once
    /// per start.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        let remaining = self.state.remaining.saturating_sub(1);
        self.state.set_remaining(remaining);

        if let Some(deadline) = self.next_deadline.as_mut() {
            *deadline += self.period;
        }

        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(&self.state);
        }

        if remaining > 0 {
            return TickOutcome::Ticked { remaining };
        }

        self.stop();

        if let Some(mut on_expire) = self.on_expire.take() {
            on_expire(&self.state);
        }

        TickOutcome::Expired
    }

    /// Resolve when the next tick is due.
    ///
    /// The returned future does not borrow the timer, so it can be raced
    /// against other events while the timer itself stays available. It never
    /// resolves while the timer is stopped.
    pub fn wait_for_tick(&self) -> impl Future<Output = ()> + Send + use<> {
        let deadline = self.next_deadline;
        async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Wait for the next tick to come due, then apply it.
    ///
    /// Pending forever while the timer is stopped.
    pub async fn next_tick(&mut self) -> TickOutcome {
        self.wait_for_tick().await;
        self.tick()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn remaining(&self) -> u32 {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline of the next scheduled tick, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("state", &self.state)
            .field("period", &self.period)
            .field("next_deadline", &self.next_deadline)
            .finish_non_exhaustive()
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut(&TimerState) + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move |_: &TimerState| {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(3600), "60:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_new_timer_is_stopped() {
        let timer = CountdownTimer::new(90);
        assert_eq!(timer.remaining(), 90);
        assert!(!timer.is_running());
        assert_eq!(timer.display(), "01:30");
        assert!(timer.next_deadline().is_none());
    }

    #[test]
    fn test_tick_decrements_and_notifies() {
        let (ticks, on_tick) = counter();
        let (expiries, on_expire) = counter();
        let mut timer = CountdownTimer::new(3);
        timer.start(on_tick, on_expire);

        assert_eq!(timer.tick(), TickOutcome::Ticked { remaining: 2 });
        assert_eq!(timer.display(), "00:02");
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        assert_eq!(expiries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_expiry_stops_before_callback() {
        let observed = Arc::new(Mutex::new(None));
        let observed_handle = Arc::clone(&observed);
        let mut timer = CountdownTimer::new(1);

        timer.start(
            |_| {},
            move |state: &TimerState| {
                *observed_handle.lock().unwrap() = Some((state.is_running(), state.remaining()));
            },
        );

        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(*observed.lock().unwrap(), Some((false, 0)));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_tick_callback_runs_before_expire() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let tick_order = Arc::clone(&order);
        let expire_order = Arc::clone(&order);
        let mut timer = CountdownTimer::new(1);

        timer.start(
            move |state: &TimerState| tick_order.lock().unwrap().push(("tick", state.is_running())),
            move |state: &TimerState| {
                expire_order.lock().unwrap().push(("expire", state.is_running()))
            },
        );
        timer.tick();

        assert_eq!(
            *order.lock().unwrap(),
            vec![("tick", true), ("expire", false)]
        );
    }

    #[test]
    fn test_start_with_zero_remaining_does_not_run() {
        let (ticks, on_tick) = counter();
        let mut timer = CountdownTimer::new(0);
        timer.start(on_tick, |_| {});

        assert!(!timer.is_running());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_double_start_keeps_callbacks() {
        let (first, on_tick_first) = counter();
        let (second, on_tick_second) = counter();
        let mut timer = CountdownTimer::new(10);

        timer.start(on_tick_first, |_| {});
        timer.tick();
        timer.start(on_tick_second, |_| {});
        timer.tick();

        assert_eq!(timer.remaining(), 8);
        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = CountdownTimer::new(10);
        timer.start(|_| {}, |_| {});
        timer.tick();

        timer.stop();
        let after_first = timer.state().clone();
        timer.stop();

        assert_eq!(timer.state(), &after_first);
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), 9);
    }

    #[test]
    fn test_reset_clears_run_without_callbacks() {
        let (ticks, on_tick) = counter();
        let (expiries, on_expire) = counter();
        let mut timer = CountdownTimer::new(2);
        timer.start(on_tick, on_expire);

        timer.reset(30);

        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 30);
        assert_eq!(timer.display(), "00:30");
        assert!(timer.next_deadline().is_none());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert_eq!(expiries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restart_after_stop_resumes() {
        let mut timer = CountdownTimer::new(5);
        timer.start(|_| {}, |_| {});
        timer.tick();
        timer.stop();
        timer.start(|_| {}, |_| {});
        timer.tick();

        assert_eq!(timer.remaining(), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_tick_waits_one_period() {
        let mut timer = CountdownTimer::new(2);
        let started = Instant::now();
        timer.start(|_| {}, |_| {});

        assert_eq!(timer.next_tick().await, TickOutcome::Ticked { remaining: 1 });
        let first = started.elapsed();
        assert!(first >= Duration::from_secs(1) && first < Duration::from_millis(1100));

        assert_eq!(timer.next_tick().await, TickOutcome::Expired);
        let second = started.elapsed();
        assert!(second >= Duration::from_secs(2) && second < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_period() {
        let mut timer = CountdownTimer::with_period(1, Duration::from_millis(250));
        let started = Instant::now();
        timer.start(|_| {}, |_| {});

        assert_eq!(timer.next_tick().await, TickOutcome::Expired);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(250) && elapsed < Duration::from_millis(300));
    }
}
