/// Three-tier accessibility classification for a reported location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum AccessibilityLevel {
    Accessible,
    Partial,
    Inaccessible,
}

impl AccessibilityLevel {
    pub const ALL: [Self; 3] = [Self::Accessible, Self::Partial, Self::Inaccessible];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accessible => "accessible",
            Self::Partial => "partial",
            Self::Inaccessible => "inaccessible",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Accessible),
            1 => Some(Self::Partial),
            2 => Some(Self::Inaccessible),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "accessible" => Some(Self::Accessible),
            "partial" => Some(Self::Partial),
            "inaccessible" => Some(Self::Inaccessible),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Accessible => "Accessible",
            Self::Partial => "Partially accessible",
            Self::Inaccessible => "Not accessible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum DisabilityType {
    Motor,
    Visual,
    Hearing,
    Multiple,
}

impl DisabilityType {
    pub const ALL: [Self; 4] = [Self::Motor, Self::Visual, Self::Hearing, Self::Multiple];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Motor => "motor",
            Self::Visual => "visual",
            Self::Hearing => "hearing",
            Self::Multiple => "multiple",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Motor),
            1 => Some(Self::Visual),
            2 => Some(Self::Hearing),
            3 => Some(Self::Multiple),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "motor" => Some(Self::Motor),
            "visual" => Some(Self::Visual),
            "hearing" => Some(Self::Hearing),
            "multiple" => Some(Self::Multiple),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Motor => "Motor",
            Self::Visual => "Visual",
            Self::Hearing => "Hearing",
            Self::Multiple => "Multiple",
        }
    }
}

/// Parses the comma-joined disability token list as stored in sqlite.
/// Unknown tokens are dropped.
pub fn parse_disability_list(value: &str) -> Vec<DisabilityType> {
    value.split(',').filter_map(DisabilityType::parse).collect()
}

/// Joins disability types back into the stored comma-separated form.
pub fn join_disability_list(types: &[DisabilityType]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum LocationCategory {
    Sidewalks,
    PublicBuildings,
    Transit,
}

impl LocationCategory {
    pub const ALL: [Self; 3] = [Self::Sidewalks, Self::PublicBuildings, Self::Transit];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sidewalks => "sidewalks",
            Self::PublicBuildings => "public_buildings",
            Self::Transit => "transit",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Sidewalks),
            1 => Some(Self::PublicBuildings),
            2 => Some(Self::Transit),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sidewalks" => Some(Self::Sidewalks),
            "public_buildings" => Some(Self::PublicBuildings),
            "transit" => Some(Self::Transit),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sidewalks => "Sidewalks",
            Self::PublicBuildings => "Public buildings",
            Self::Transit => "Public transit",
        }
    }

    /// Problem types the report form offers for this category. `Other` is
    /// always the last entry.
    pub const fn problem_options(self) -> &'static [ProblemType] {
        match self {
            Self::Sidewalks => &[
                ProblemType::BrokenSidewalk,
                ProblemType::Pothole,
                ProblemType::UnevenSurface,
                ProblemType::BlockedPath,
                ProblemType::Other,
            ],
            Self::PublicBuildings => &[
                ProblemType::MissingRamp,
                ProblemType::SteepRamp,
                ProblemType::BlockedAccess,
                ProblemType::InaccessibleRestroom,
                ProblemType::Other,
            ],
            Self::Transit => &[
                ProblemType::StopWithoutRamp,
                ProblemType::BusWithoutLift,
                ProblemType::StationWithoutAccess,
                ProblemType::Other,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum ProblemType {
    BrokenSidewalk,
    Pothole,
    UnevenSurface,
    BlockedPath,
    MissingRamp,
    SteepRamp,
    BlockedAccess,
    InaccessibleRestroom,
    StopWithoutRamp,
    BusWithoutLift,
    StationWithoutAccess,
    Other,
}

impl ProblemType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrokenSidewalk => "broken_sidewalk",
            Self::Pothole => "pothole",
            Self::UnevenSurface => "uneven_surface",
            Self::BlockedPath => "blocked_path",
            Self::MissingRamp => "missing_ramp",
            Self::SteepRamp => "steep_ramp",
            Self::BlockedAccess => "blocked_access",
            Self::InaccessibleRestroom => "inaccessible_restroom",
            Self::StopWithoutRamp => "stop_without_ramp",
            Self::BusWithoutLift => "bus_without_lift",
            Self::StationWithoutAccess => "station_without_access",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "broken_sidewalk" => Some(Self::BrokenSidewalk),
            "pothole" => Some(Self::Pothole),
            "uneven_surface" => Some(Self::UnevenSurface),
            "blocked_path" => Some(Self::BlockedPath),
            "missing_ramp" => Some(Self::MissingRamp),
            "steep_ramp" => Some(Self::SteepRamp),
            "blocked_access" => Some(Self::BlockedAccess),
            "inaccessible_restroom" => Some(Self::InaccessibleRestroom),
            "stop_without_ramp" => Some(Self::StopWithoutRamp),
            "bus_without_lift" => Some(Self::BusWithoutLift),
            "station_without_access" => Some(Self::StationWithoutAccess),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BrokenSidewalk => "Broken sidewalk",
            Self::Pothole => "Pothole",
            Self::UnevenSurface => "Uneven surface",
            Self::BlockedPath => "Obstacle on the path",
            Self::MissingRamp => "Missing ramp",
            Self::SteepRamp => "Ramp too steep",
            Self::BlockedAccess => "Blocked access",
            Self::InaccessibleRestroom => "Inaccessible restroom",
            Self::StopWithoutRamp => "Stop without ramp",
            Self::BusWithoutLift => "Bus without lift",
            Self::StationWithoutAccess => "Station without access",
            Self::Other => "Other",
        }
    }

    /// Whether this problem type is one the form offers for `category`.
    /// `Other` is valid everywhere.
    pub fn valid_for(self, category: LocationCategory) -> bool {
        category.problem_options().contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_type_category_subsets() {
        assert!(ProblemType::BrokenSidewalk.valid_for(LocationCategory::Sidewalks));
        assert!(!ProblemType::BrokenSidewalk.valid_for(LocationCategory::PublicBuildings));
        assert!(ProblemType::MissingRamp.valid_for(LocationCategory::PublicBuildings));
        assert!(!ProblemType::MissingRamp.valid_for(LocationCategory::Transit));
        assert!(ProblemType::BusWithoutLift.valid_for(LocationCategory::Transit));
        for category in LocationCategory::ALL {
            assert!(ProblemType::Other.valid_for(category));
        }
    }

    #[test]
    fn every_category_ends_with_other() {
        for category in LocationCategory::ALL {
            assert_eq!(category.problem_options().last(), Some(&ProblemType::Other));
        }
    }

    #[test]
    fn disability_list_round_trips_through_storage_form() {
        let list = vec![DisabilityType::Visual, DisabilityType::Motor];
        let joined = join_disability_list(&list);
        assert_eq!(joined, "visual,motor");
        assert_eq!(parse_disability_list(&joined), list);
        assert!(parse_disability_list("").is_empty());
        assert_eq!(
            parse_disability_list("motor,bogus,hearing"),
            vec![DisabilityType::Motor, DisabilityType::Hearing]
        );
    }

    #[test]
    fn parse_is_case_and_whitespace_tolerant() {
        assert_eq!(
            AccessibilityLevel::parse(" Inaccessible "),
            Some(AccessibilityLevel::Inaccessible)
        );
        assert_eq!(
            LocationCategory::parse("TRANSIT"),
            Some(LocationCategory::Transit)
        );
        assert_eq!(ProblemType::parse("nope"), None);
    }
}
