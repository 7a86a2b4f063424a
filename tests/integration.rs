//! Integration tests for snapsense host-testable logic.
//!
//! Each test plays interrupt producers against a shared queue and lets
//! the dispatcher drain it, the way the firmware does.

use snapsense::{
    Accelerometer, Axis, EventCode, EventDispatcher, EventQueue, LineAssembler, Link,
    MessageChannel, Orientation, OrientationConfig, OrientationMonitor, SnapClassifier,
    SnapConfig, SystemEventQueue, TickControl, UartDriver,
};

#[derive(Default)]
struct Gate {
    armed: bool,
}

impl TickControl for Gate {
    fn enable_tick_events(&mut self) {
        self.armed = true;
    }

    fn disable_tick_events(&mut self) {
        self.armed = false;
    }
}

/// Accelerometer that reads flat zero on every axis.
struct Still;

impl Accelerometer for Still {
    type Error = ();

    fn read_axis(&mut self, _axis: Axis) -> Result<i16, ()> {
        Ok(0)
    }
}

/// X-axis readings replayed one per loop iteration.
struct XSequence {
    readings: Vec<i16>,
    iteration: usize,
}

impl Accelerometer for XSequence {
    type Error = ();

    fn read_axis(&mut self, axis: Axis) -> Result<i16, ()> {
        match axis {
            Axis::X => Ok(self.readings[self.iteration]),
            _ => Ok(0),
        }
    }
}

/// Window timing with the debounce below one tick, so one edge per
/// tick survives.
const CONFIG: SnapConfig = SnapConfig {
    debounce_ms: 50,
    window_ticks: 10,
};
const TICK_MS: u64 = 60;

/// Drive `ticks` timer periods starting at tick 1, with an edge landing
/// just before each listed tick fires.  Ticks only reach the classifier
/// while the gate is open.  Returns the tick at which the queue first
/// gained an event.
fn play_snaps(
    classifier: &SnapClassifier,
    queue: &SystemEventQueue,
    edge_ticks: &[u64],
    ticks: u64,
) -> Option<u64> {
    let mut gate = Gate::default();
    let mut produced_at = None;

    for tick in 1..=ticks {
        if edge_ticks.contains(&tick) {
            classifier.on_edge(tick * TICK_MS, &mut gate);
        }
        if gate.armed {
            if let Some(event) = classifier.on_tick(&mut gate) {
                queue.insert(event).unwrap();
                produced_at.get_or_insert(tick);
            }
        }
    }
    produced_at
}

fn drain(queue: &SystemEventQueue) -> Vec<EventCode> {
    let mut dispatcher = EventDispatcher::new(queue, OrientationMonitor::default());
    let mut seen = Vec::new();
    while !queue.is_empty() {
        dispatcher.run_once(&mut Still, &mut |e: EventCode| seen.push(e));
    }
    seen
}

#[test]
fn scenario_single_snap() {
    let classifier = SnapClassifier::new(CONFIG);
    let queue = SystemEventQueue::new();

    // Edges at ticks 1 and 3; the window opened at tick 1 closes on its
    // tenth tick.
    let at = play_snaps(&classifier, &queue, &[1, 3], 30);
    assert_eq!(at, Some(10));
    assert_eq!(drain(&queue), vec![EventCode::SnapSingle]);
}

#[test]
fn scenario_double_snap() {
    let classifier = SnapClassifier::new(CONFIG);
    let queue = SystemEventQueue::new();

    let at = play_snaps(&classifier, &queue, &[1, 2, 3, 4], 30);
    assert_eq!(at, Some(10));
    assert_eq!(drain(&queue), vec![EventCode::SnapDouble]);
}

#[test]
fn scenario_three_edges_produce_nothing() {
    let classifier = SnapClassifier::new(CONFIG);
    let queue = SystemEventQueue::new();

    assert_eq!(play_snaps(&classifier, &queue, &[1, 2, 3], 30), None);
    assert!(queue.is_empty());

    let state = classifier.state();
    assert_eq!(state.edge_count, 0);
    assert!(!state.window_open);
}

#[test]
fn back_to_back_windows_classify_independently() {
    let classifier = SnapClassifier::new(CONFIG);
    let queue = SystemEventQueue::new();

    // Window 1: ticks 1..10 with two edges.  Window 2 opens at tick 20
    // with four edges.
    play_snaps(&classifier, &queue, &[1, 5, 20, 21, 22, 23], 40);
    assert_eq!(
        drain(&queue),
        vec![EventCode::SnapSingle, EventCode::SnapDouble]
    );
}

#[test]
fn scenario_orientation_reports_on_transitions() {
    let queue = SystemEventQueue::new();
    let mut dispatcher = EventDispatcher::new(
        &queue,
        OrientationMonitor::new(OrientationConfig { threshold: 2000 }),
    );
    let mut accel = XSequence {
        readings: vec![2500, 2500, 500, 2500],
        iteration: 0,
    };

    let mut per_iteration = Vec::new();
    for i in 0..4 {
        accel.iteration = i;
        let mut seen = Vec::new();
        dispatcher.run_once(&mut accel, &mut |e: EventCode| seen.push(e));
        per_iteration.push(seen);
    }

    let vertical = EventCode::OrientationChanged(Orientation::Vertical);
    assert_eq!(
        per_iteration,
        vec![vec![vertical], vec![], vec![], vec![vertical]]
    );
}

/// Line assembler and outgoing byte log standing in for the UART.
struct LoopbackPort {
    rx: LineAssembler<32>,
    wire: Vec<u8>,
}

impl UartDriver for LoopbackPort {
    fn has_complete_message(&self) -> bool {
        self.rx.has_complete_message()
    }

    fn send_char(&mut self, byte: u8) {
        self.wire.push(byte);
    }

    fn last_received_char(&self) -> u8 {
        self.rx.last_received_char()
    }
}

#[test]
fn scenario_terminal_message_while_transmitting() {
    let queue = SystemEventQueue::new();
    let mut channel: MessageChannel<32> = MessageChannel::new(Link::Terminal);
    let mut port = LoopbackPort {
        rx: LineAssembler::new(),
        wire: Vec::new(),
    };

    channel.begin_send(b"READY\r\n", &mut port).unwrap();

    // Receive and transmit interrupts interleave byte by byte.
    for &byte in b"status\r\n" {
        port.rx.push(byte);
        channel.publish_receive_complete(&port, &queue);
        channel.on_transmit_character_sent(&mut port);
    }
    while !channel.is_idle() {
        channel.on_transmit_character_sent(&mut port);
    }

    assert_eq!(port.wire, b"READY\r\n");
    assert_eq!(drain(&queue), vec![EventCode::MessageReady(Link::Terminal)]);
    assert_eq!(port.rx.take_line().unwrap().as_slice(), b"status");
}

#[test]
fn producers_interleave_in_arrival_order() {
    let classifier = SnapClassifier::new(CONFIG);
    let queue = SystemEventQueue::new();
    let mut gate = Gate::default();

    queue.insert(EventCode::MessageReady(Link::Broker)).unwrap();
    classifier.on_edge(0, &mut gate);
    classifier.on_edge(120, &mut gate);
    queue.insert(EventCode::MessageReady(Link::Terminal)).unwrap();
    for _ in 0..CONFIG.window_ticks {
        if let Some(event) = classifier.on_tick(&mut gate) {
            queue.insert(event).unwrap();
        }
    }

    assert_eq!(
        drain(&queue),
        vec![
            EventCode::MessageReady(Link::Broker),
            EventCode::MessageReady(Link::Terminal),
            EventCode::SnapSingle,
        ]
    );
}

/// Feed `bytes` through the receive path, one interrupt per byte.
fn receive<const N: usize>(
    port: &mut LoopbackPort,
    channel: &mut MessageChannel<32>,
    queue: &EventQueue<N>,
    bytes: &[u8],
) {
    for &byte in bytes {
        port.rx.push(byte);
        channel.publish_receive_complete(&*port, queue);
    }
}

#[test]
fn link_recovers_after_message_ready_is_rejected() {
    let queue: EventQueue<1> = EventQueue::new();
    queue.insert(EventCode::SnapSingle).unwrap();

    let mut channel: MessageChannel<32> = MessageChannel::new(Link::Terminal);
    let mut port = LoopbackPort {
        rx: LineAssembler::new(),
        wire: Vec::new(),
    };
    // The queue is full when the line completes.
    receive(&mut port, &mut channel, &queue, b"one\r");
    assert_eq!(queue.dropped(), 1);
    assert_eq!(queue.consume(), Some(EventCode::SnapSingle));

    // The next byte offers the pending line again.
    receive(&mut port, &mut channel, &queue, b"\n");
    assert_eq!(queue.consume(), Some(EventCode::MessageReady(Link::Terminal)));
    assert_eq!(port.rx.take_line().unwrap().as_slice(), b"one");

    // Later lines flow normally.
    receive(&mut port, &mut channel, &queue, b"two\r");
    assert_eq!(queue.consume(), Some(EventCode::MessageReady(Link::Terminal)));
    assert_eq!(port.rx.take_line().unwrap().as_slice(), b"two");
    assert!(queue.is_empty());
}
