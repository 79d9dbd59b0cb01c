use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::predict::Propagator;

use super::clock::SimulatedClock;
use super::controller::{lock, SharedRegistry};
use super::pipeline::PositionPipeline;
use super::sink::{Frame, RenderSink};

/// Drives the clock and pushes one frame per tick into every sink.
pub struct Ticker<P> {
    clock: SimulatedClock,
    pipeline: PositionPipeline<P>,
    registry: SharedRegistry,
    sinks: Vec<Box<dyn RenderSink>>,
    time_tx: watch::Sender<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct TickerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<u64>,
}

impl TickerHandle {
    /// Stops the loop and returns how many ticks ran.
    pub async fn stop(self) -> u64 {
        let _ = self.stop_tx.send(());
        match self.join.await {
            Ok(ticks) => ticks,
            Err(e) => {
                log::error!("Ticker task failed: {}", e);
                0
            }
        }
    }
}

impl<P: Propagator> Ticker<P> {
    pub fn new(
        clock: SimulatedClock,
        pipeline: PositionPipeline<P>,
        registry: SharedRegistry,
    ) -> Self {
        let (time_tx, _) = watch::channel(clock.current_time());
        Self {
            clock,
            pipeline,
            registry,
            sinks: Vec::new(),
            time_tx,
        }
    }

    pub fn with_sink(mut self, sink: impl RenderSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Receives the simulated time after every tick.
    pub fn subscribe_time(&self) -> watch::Receiver<DateTime<Utc>> {
        self.time_tx.subscribe()
    }

    /// Advance the clock, recompute every position, feed the sinks.
    pub fn tick(&mut self) -> Frame {
        let time = self.clock.advance();
        self.time_tx.send_replace(time);

        let (positions, tracked) = {
            let registry = lock(&self.registry);
            (self.pipeline.compute_positions(&registry, time), registry.len())
        };
        let frame = Frame { time, positions };
        log::trace!(
            "tick {}: {} of {} objects placed",
            time,
            frame.positions.len(),
            tracked
        );

        for sink in &mut self.sinks {
            sink.render(&frame);
        }
        frame
    }

    /// Ticks every `cadence` of wall-clock time until `stop_rx` fires or
    /// `max_ticks` is reached. Returns the number of ticks run.
    pub async fn run(
        mut self,
        cadence: std::time::Duration,
        max_ticks: Option<u64>,
        mut stop_rx: oneshot::Receiver<()>,
    ) -> u64 {
        let mut timer = interval(cadence);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0;

        log::info!(
            "Ticker started at {} (step {}, every {:?})",
            self.clock.current_time(),
            self.clock.step(),
            cadence
        );

        while max_ticks.map_or(true, |max| ticks < max) {
            let should_stop = tokio::select! {
                _ = timer.tick() => false,
                _ = &mut stop_rx => true,
            };
            if should_stop {
                break;
            }
            self.tick();
            ticks += 1;
        }

        log::info!("Ticker stopped after {} ticks at {}", ticks, self.clock.current_time());
        ticks
    }
}

impl<P: Propagator + Send + 'static> Ticker<P> {
    pub fn spawn(self, cadence: std::time::Duration) -> TickerHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(self.run(cadence, None, stop_rx));
        TickerHandle { stop_tx, join }
    }
}
