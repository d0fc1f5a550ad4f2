// Selection state - the single source of truth for what the user is looking at

/// Index value meaning "no point selected".
pub const NO_SELECTION: i64 = -1;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// What a setter changed. The session decides how to react to each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    PointSelected,
    ChannelChanged,
    ColorRangeChanged,
    TimeRangeChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    current_point_index: i64,
    channel_index: i64,
    vmin: f64,
    vmax: f64,
    time_range: TimeRange,
}

impl SelectionState {
    pub fn new(channel_index: i64, vmin: f64, vmax: f64) -> Self {
        Self {
            current_point_index: NO_SELECTION,
            channel_index,
            vmin,
            vmax,
            time_range: TimeRange::default(),
        }
    }

    pub fn current_point_index(&self) -> i64 {
        self.current_point_index
    }

    pub fn channel_index(&self) -> i64 {
        self.channel_index
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn has_selection(&self) -> bool {
        self.current_point_index >= 0
    }

    /// Any negative index clears the selection.
    pub fn select_point(&mut self, index: i64) -> StateChange {
        self.current_point_index = index.max(NO_SELECTION);
        StateChange::PointSelected
    }

    pub fn set_channel(&mut self, channel_index: i64) -> StateChange {
        self.channel_index = channel_index;
        StateChange::ChannelChanged
    }

    pub fn set_color_range(&mut self, vmin: f64, vmax: f64) -> StateChange {
        self.vmin = vmin;
        self.vmax = vmax;
        StateChange::ColorRangeChanged
    }

    /// Replaces both bounds. Blank strings count as unset.
    pub fn set_time_range(&mut self, start: Option<&str>, end: Option<&str>) -> StateChange {
        fn normalize(bound: Option<&str>) -> Option<String> {
            bound.map(str::trim).filter(|b| !b.is_empty()).map(str::to_string)
        }
        self.time_range = TimeRange {
            start: normalize(start),
            end: normalize(end),
        };
        StateChange::TimeRangeChanged
    }

    pub fn clear_time_range(&mut self) -> StateChange {
        self.time_range = TimeRange::default();
        StateChange::TimeRangeChanged
    }
}
