//! Classified event codes - the only thing that travels through the
//! event queue.

/// Which serial link a message arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Link {
    /// Local debug console.
    Terminal,
    /// Broker bridge co-processor.
    Broker,
}

/// Discrete device orientation, one per accelerometer axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Gravity on the X axis.
    Vertical,
    /// Gravity on the Y axis.
    Lateral,
    /// Gravity on the Z axis.
    Horizontal,
}

/// Accelerometer measurement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in orientation priority order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Orientation reported when gravity sits on this axis.
    pub const fn orientation(self) -> Orientation {
        match self {
            Axis::X => Orientation::Vertical,
            Axis::Y => Orientation::Lateral,
            Axis::Z => Orientation::Horizontal,
        }
    }
}

/// Everything the control loop can be asked to handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventCode {
    /// A complete line is waiting on the given link.
    MessageReady(Link),
    /// One finger snap (two sensor edges) inside a window.
    SnapSingle,
    /// Two finger snaps (four sensor edges) inside a window.
    SnapDouble,
    /// The device settled into a new orientation.
    OrientationChanged(Orientation),
}
