//! Course data model: controls, courses, special objects and the event
//! that owns them.
//!
//! The [`ControlRegistry`] owns the canonical control records. A
//! [`Course`] holds deep copies, so editing a course's copy never touches
//! the registry; [`ControlRegistry::update`] writes through both.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::layout::defaults::CircleDiameter;
use crate::scale::{Crs, ScaleSizes};
use crate::types::{BBox, MapScale};

// ============================================================================
// Controls
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Start,
    Normal,
    Finish,
}

impl ControlKind {
    /// Start and finish carry no number label.
    pub fn is_numbered(self) -> bool {
        matches!(self, ControlKind::Normal)
    }
}

/// ISOM control description columns that belong to a control
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DescriptionColumn {
    C,
    D,
    E,
    F,
    G,
    H,
}

impl DescriptionColumn {
    pub const ALL: [DescriptionColumn; 6] = [
        DescriptionColumn::C,
        DescriptionColumn::D,
        DescriptionColumn::E,
        DescriptionColumn::F,
        DescriptionColumn::G,
        DescriptionColumn::H,
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DescriptionEntry {
    #[default]
    Unset,
    /// Reference into the description symbol set, e.g. `"1.3"`
    Symbol(String),
    Text(String),
}

pub type Description = BTreeMap<DescriptionColumn, DescriptionEntry>;

/// Description with every column unset.
pub fn empty_description() -> Description {
    DescriptionColumn::ALL
        .into_iter()
        .map(|col| (col, DescriptionEntry::Unset))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: ControlId,
    pub kind: ControlKind,
    /// Punch code; start and finish have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    pub coordinates: DVec2,
    #[serde(default = "empty_description")]
    pub description: Description,
    /// Manual label offset from `coordinates`, overrides automatic placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_location: Option<DVec2>,
}

impl Control {
    pub fn new(id: ControlId, kind: ControlKind, coordinates: DVec2) -> Self {
        Self {
            id,
            kind,
            code: None,
            coordinates,
            description: empty_description(),
            number_location: None,
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_number_location(mut self, offset: DVec2) -> Self {
        self.number_location = Some(offset);
        self
    }
}

// ============================================================================
// Control registry
// ============================================================================

/// Canonical owner of every control in an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Control>", into = "Vec<Control>")]
pub struct ControlRegistry {
    controls: BTreeMap<ControlId, Control>,
    next_id: u32,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a control with a sequence-generated id.
    pub fn create(&mut self, kind: ControlKind, coordinates: DVec2) -> ControlId {
        let id = ControlId(self.next_id.max(1));
        self.insert(Control::new(id, kind, coordinates));
        id
    }

    /// Insert a control with a caller-assigned id, returning the record it replaced.
    pub fn insert(&mut self, control: Control) -> Option<Control> {
        self.next_id = self.next_id.max(control.id.0.saturating_add(1));
        self.controls.insert(control.id, control)
    }

    pub fn get(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(&id)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.values()
    }

    /// Append (or insert at `index`) a deep copy of a registry control to a course.
    ///
    /// Returns `false` when the id is unknown.
    pub fn add_to_course(&self, id: ControlId, course: &mut Course, index: Option<usize>) -> bool {
        let Some(control) = self.controls.get(&id) else {
            return false;
        };
        let copy = control.clone();
        match index {
            Some(i) if i <= course.controls.len() => course.controls.insert(i, copy),
            _ => course.controls.push(copy),
        }
        true
    }

    /// Apply `edit` to the registry record and to every course copy of it.
    ///
    /// Returns `false` when the id is unknown; no course is touched then.
    pub fn update<F>(&mut self, id: ControlId, courses: &mut [Course], mut edit: F) -> bool
    where
        F: FnMut(&mut Control),
    {
        let Some(control) = self.controls.get_mut(&id) else {
            return false;
        };
        edit(control);
        for course in courses.iter_mut() {
            for copy in course.controls.iter_mut().filter(|c| c.id == id) {
                edit(copy);
            }
        }
        true
    }

    /// Remove a control from the registry and from every course.
    pub fn remove(&mut self, id: ControlId, courses: &mut [Course]) -> Option<Control> {
        let removed = self.controls.remove(&id)?;
        for course in courses.iter_mut() {
            course.controls.retain(|c| c.id != id);
        }
        Some(removed)
    }
}

impl From<Vec<Control>> for ControlRegistry {
    fn from(controls: Vec<Control>) -> Self {
        let mut registry = ControlRegistry::new();
        for control in controls {
            registry.insert(control);
        }
        registry
    }
}

impl From<ControlRegistry> for Vec<Control> {
    fn from(registry: ControlRegistry) -> Self {
        registry.controls.into_values().collect()
    }
}

// ============================================================================
// Special objects
// ============================================================================

/// Kind of a special object. Unknown kinds from hand-edited files are kept
/// so the layout can warn about them instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpecialObjectKind {
    Line,
    WhiteOut,
    Descriptions,
    Other(String),
}

impl SpecialObjectKind {
    pub fn as_str(&self) -> &str {
        match self {
            SpecialObjectKind::Line => "line",
            SpecialObjectKind::WhiteOut => "white-out",
            SpecialObjectKind::Descriptions => "descriptions",
            SpecialObjectKind::Other(s) => s,
        }
    }
}

impl From<String> for SpecialObjectKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "line" => SpecialObjectKind::Line,
            "white-out" => SpecialObjectKind::WhiteOut,
            "descriptions" => SpecialObjectKind::Descriptions,
            _ => SpecialObjectKind::Other(s),
        }
    }
}

impl From<SpecialObjectKind> for String {
    fn from(kind: SpecialObjectKind) -> Self {
        match kind {
            SpecialObjectKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialObject {
    pub id: u32,
    pub kind: SpecialObjectKind,
    #[serde(default)]
    pub is_all_courses: bool,
    pub locations: Vec<DVec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

impl SpecialObject {
    pub fn new(id: u32, kind: SpecialObjectKind, locations: Vec<DVec2>) -> Self {
        Self {
            id,
            kind,
            is_all_courses: false,
            locations,
            color: None,
            line_width: None,
        }
    }
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CourseType {
    #[default]
    Normal,
    /// Unordered control set; no connectors
    Score,
    /// Every control of the event; no connectors
    AllControls,
}

impl CourseType {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseType::Normal => "normal",
            CourseType::Score => "score",
            CourseType::AllControls => "all-controls",
        }
    }
}

impl FromStr for CourseType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CourseType::Normal),
            "score" => Ok(CourseType::Score),
            "all-controls" => Ok(CourseType::AllControls),
            other => Err(LayoutError::UnknownCourseType {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CourseType {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CourseType> for String {
    fn from(t: CourseType) -> Self {
        t.as_str().to_string()
    }
}

/// What a control's number label shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    #[default]
    Sequence,
    Code,
}

/// Printed page area in paper millimetres
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    pub bounds: BBox,
    #[serde(default)]
    pub landscape: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub controls: Vec<Control>,
    pub print_scale: f64,
    #[serde(default, rename = "type")]
    pub course_type: CourseType,
    #[serde(default)]
    pub special_objects: Vec<SpecialObject>,
    #[serde(default)]
    pub label_kind: LabelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_area: Option<PrintArea>,
}

impl Course {
    pub fn new(id: u32, name: impl Into<String>, print_scale: f64) -> Self {
        Self {
            id,
            name: name.into(),
            controls: Vec::new(),
            print_scale,
            course_type: CourseType::Normal,
            special_objects: Vec::new(),
            label_kind: LabelKind::Sequence,
            print_area: None,
        }
    }

    pub fn with_type(mut self, course_type: CourseType) -> Self {
        self.course_type = course_type;
        self
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }
}

// ============================================================================
// Appearance, map and event
// ============================================================================

/// Course appearance settings that drive symbol sizes and gaps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseAppearance {
    pub scale_sizes: ScaleSizes,
    /// Gap left between a connector and the symbols it joins, mm at print scale
    pub auto_leg_gap_size: f64,
    pub blend_purple: bool,
    pub circle_diameter: CircleDiameter,
}

impl Default for CourseAppearance {
    fn default() -> Self {
        Self {
            scale_sizes: ScaleSizes::RelativeToMap,
            auto_leg_gap_size: 0.0,
            blend_purple: true,
            circle_diameter: CircleDiameter::Isom,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub scale: MapScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Crs>,
}

impl MapInfo {
    pub fn new(scale: MapScale) -> Self {
        Self { scale, crs: None }
    }
}

/// Everything a course-setting session edits.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    pub map: MapInfo,
    #[serde(default)]
    pub appearance: CourseAppearance,
    #[serde(default)]
    pub controls: ControlRegistry,
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Event-level special objects; those with `is_all_courses` appear on every course
    #[serde(default)]
    pub special_objects: Vec<SpecialObject>,
}

impl Event {
    pub fn course(&self, id: u32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Event-level special objects shown on every course.
    pub fn all_courses_objects(&self) -> Vec<SpecialObject> {
        self.special_objects
            .iter()
            .filter(|o| o.is_all_courses)
            .cloned()
            .collect()
    }
}
