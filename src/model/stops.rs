use crate::foundation::{
    core::Point,
    error::{GrainError, GrainResult},
};

/// Fewest stops a list may hold: one base fill plus one accent.
pub const MIN_STOPS: usize = 2;

/// Radius multiplier used when a stop carries no usable size.
pub const DEFAULT_SIZE: f64 = 0.8;

fn default_size() -> f64 {
    DEFAULT_SIZE
}

/// One gradient stop.
///
/// `color` is kept as the user typed it. An unparseable value is legal in the
/// model and is skipped by the compositor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    pub color: String,
    /// Normalized to the canvas; (0,0) is top-left.
    pub position: Point,
    /// Multiplier on the canvas' longest edge giving the outer radius.
    #[serde(default = "default_size")]
    pub size: f64,
}

impl ColorStop {
    pub fn new(color: impl Into<String>, position: Point, size: f64) -> Self {
        Self {
            color: color.into(),
            position,
            size,
        }
    }

    pub fn radius_factor(&self) -> f64 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size
        } else {
            DEFAULT_SIZE
        }
    }

    pub fn validate(&self) -> GrainResult<()> {
        validate_position(self.position)?;
        validate_size(self.size)
    }
}

pub(crate) fn validate_position(p: Point) -> GrainResult<()> {
    let ok = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
    if !ok(p.x) || !ok(p.y) {
        return Err(GrainError::validation(format!(
            "stop position ({}, {}) must lie in [0, 1]",
            p.x, p.y
        )));
    }
    Ok(())
}

pub(crate) fn validate_size(size: f64) -> GrainResult<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(GrainError::validation(format!(
            "stop size {size} must be finite and > 0"
        )));
    }
    Ok(())
}

/// Ordered stops. Index 0 is the base fill, the rest are radial accents.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct StopList {
    stops: Vec<ColorStop>,
}

impl StopList {
    pub fn new(stops: Vec<ColorStop>) -> GrainResult<Self> {
        if stops.len() < MIN_STOPS {
            return Err(GrainError::validation(format!(
                "a stop list needs at least {MIN_STOPS} stops, got {}",
                stops.len()
            )));
        }
        for (i, stop) in stops.iter().enumerate() {
            stop.validate()
                .map_err(|e| GrainError::validation(format!("stop {i}: {e}")))?;
        }
        Ok(Self { stops })
    }

    /// The three-stop pastel starting design.
    pub fn pastel_default() -> Self {
        Self {
            stops: vec![
                ColorStop::new("#FFB3BA", Point::new(0.2, 0.2), DEFAULT_SIZE),
                ColorStop::new("#BAFFC9", Point::new(0.8, 0.5), DEFAULT_SIZE),
                ColorStop::new("#BAE1FF", Point::new(0.5, 0.8), DEFAULT_SIZE),
            ],
        }
    }

    /// Builds a list whose stops were derived from already-valid lists.
    pub(crate) fn from_vec_unchecked(stops: Vec<ColorStop>) -> Self {
        debug_assert!(stops.len() >= MIN_STOPS);
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColorStop> {
        self.stops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorStop> {
        self.stops.iter()
    }

    pub fn as_slice(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn base(&self) -> Option<&ColorStop> {
        self.stops.first()
    }

    pub fn accents(&self) -> impl Iterator<Item = (usize, &ColorStop)> {
        self.stops.iter().enumerate().skip(1)
    }

    pub fn push(&mut self, stop: ColorStop) -> GrainResult<()> {
        stop.validate()?;
        self.stops.push(stop);
        Ok(())
    }

    /// Removes a stop; rejected when it would leave fewer than [`MIN_STOPS`].
    pub fn remove(&mut self, index: usize) -> GrainResult<ColorStop> {
        self.check_index(index)?;
        if self.stops.len() <= MIN_STOPS {
            return Err(GrainError::validation(format!(
                "cannot remove stop {index}: list would drop below {MIN_STOPS} stops"
            )));
        }
        Ok(self.stops.remove(index))
    }

    /// Moves a stop, clamping into the unit square.
    pub fn set_position(&mut self, index: usize, position: Point) -> GrainResult<()> {
        self.check_index(index)?;
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(GrainError::validation("stop position must be finite"));
        }
        self.stops[index].position =
            Point::new(position.x.clamp(0.0, 1.0), position.y.clamp(0.0, 1.0));
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> GrainResult<()> {
        self.check_index(index)?;
        self.stops[index].color = color.into();
        Ok(())
    }

    pub fn set_size(&mut self, index: usize, size: f64) -> GrainResult<()> {
        self.check_index(index)?;
        validate_size(size)?;
        self.stops[index].size = size;
        Ok(())
    }

    fn check_index(&self, index: usize) -> GrainResult<()> {
        if index >= self.stops.len() {
            return Err(GrainError::validation(format!(
                "stop index {index} out of range (len {})",
                self.stops.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<ColorStop>> for StopList {
    type Error = GrainError;

    fn try_from(stops: Vec<ColorStop>) -> GrainResult<Self> {
        Self::new(stops)
    }
}

impl From<StopList> for Vec<ColorStop> {
    fn from(list: StopList) -> Self {
        list.stops
    }
}

impl<'a> IntoIterator for &'a StopList {
    type Item = &'a ColorStop;
    type IntoIter = std::slice::Iter<'a, ColorStop>;

    fn into_iter(self) -> Self::IntoIter {
        self.stops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> StopList {
        StopList::new(vec![
            ColorStop::new("#000000", Point::new(0.5, 0.5), 1.0),
            ColorStop::new("#ffffff", Point::new(0.2, 0.2), 0.8),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_short_lists() {
        assert!(StopList::new(vec![]).is_err());
        assert!(
            StopList::new(vec![ColorStop::new("#000", Point::new(0.0, 0.0), 1.0)]).is_err()
        );
    }

    #[test]
    fn removal_below_minimum_is_rejected() {
        let mut list = two();
        let err = list.remove(0).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn removal_above_minimum_shifts_order() {
        let mut list = StopList::pastel_default();
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.color, "#BAFFC9");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().color, "#BAE1FF");
    }

    #[test]
    fn invalid_colors_are_storable() {
        let mut list = two();
        list.set_color(1, "not-a-color").unwrap();
        assert_eq!(list.get(1).unwrap().color, "not-a-color");
    }

    #[test]
    fn positions_and_sizes_are_checked() {
        let mut list = two();
        assert!(
            list.push(ColorStop::new("#fff", Point::new(1.5, 0.0), 1.0))
                .is_err()
        );
        assert!(
            list.push(ColorStop::new("#fff", Point::new(0.5, 0.5), 0.0))
                .is_err()
        );
        assert!(list.set_size(1, -2.0).is_err());
        list.set_position(1, Point::new(-0.3, 1.7)).unwrap();
        assert_eq!(list.get(1).unwrap().position, Point::new(0.0, 1.0));
    }

    #[test]
    fn deserialize_enforces_invariants_and_defaults_size() {
        let ok: StopList = serde_json::from_str(
            r##"[{"color":"#000","position":{"x":0.5,"y":0.5}},
                 {"color":"#fff","position":{"x":0.1,"y":0.9},"size":1.5}]"##,
        )
        .unwrap();
        assert_eq!(ok.get(0).unwrap().size, DEFAULT_SIZE);
        assert_eq!(ok.get(1).unwrap().size, 1.5);

        let short =
            serde_json::from_str::<StopList>(r##"[{"color":"#000","position":{"x":0,"y":0}}]"##);
        assert!(short.is_err());
    }

    #[test]
    fn radius_factor_falls_back() {
        let mut s = ColorStop::new("#fff", Point::new(0.0, 0.0), 0.0);
        assert_eq!(s.radius_factor(), DEFAULT_SIZE);
        s.size = 1.25;
        assert_eq!(s.radius_factor(), 1.25);
    }
}
