//! Shared domain enums stored as text columns

use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgArgumentBuffer, Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Declares a text-backed enum: serde labels, `as_str`/`FromStr`/`Display`
/// and the sqlx conversions all share the same label table.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Lifecycle status of a trackable resource
    ResourceStatus {
        Available => "Available",
        InUse => "In Use",
        InRepair => "In Repair",
        Retired => "Retired",
        Lost => "Lost",
    }
}

text_enum! {
    /// Every kind of resource that carries a status and can be checked out
    ResourceKind {
        Asset => "asset",
        Equipment => "equipment",
        Computer => "computer",
        Monitor => "monitor",
        Printer => "printer",
        NetworkDevice => "networkDevice",
    }
}

text_enum! {
    /// Equipment kinds a borrow request may target (assets are never lent)
    EquipmentKind {
        Equipment => "equipment",
        Computer => "computer",
        Monitor => "monitor",
        Printer => "printer",
        NetworkDevice => "networkDevice",
    }
}

text_enum! {
    /// Action recorded in the `transactions` log
    TransitionAction {
        CheckOut => "Check-out",
        CheckIn => "Check-in",
        StatusChange => "Status Change",
    }
}

text_enum! {
    /// Action recorded in the `borrow_request_events` log
    BorrowEventAction {
        Submitted => "Submitted",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

text_enum! {
    /// Current state of a borrow request, derived from its events
    BorrowStatus {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

impl ResourceKind {
    pub fn table(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "assets",
            ResourceKind::Equipment => "equipment",
            ResourceKind::Computer => "computers",
            ResourceKind::Monitor => "monitors",
            ResourceKind::Printer => "printers",
            ResourceKind::NetworkDevice => "network_devices",
        }
    }

    /// Label used in caller-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "Asset",
            ResourceKind::Equipment => "Equipment",
            ResourceKind::Computer => "Computer",
            ResourceKind::Monitor => "Monitor",
            ResourceKind::Printer => "Printer",
            ResourceKind::NetworkDevice => "Network device",
        }
    }

    /// Only assets are soft-deleted
    pub fn soft_deletes(&self) -> bool {
        matches!(self, ResourceKind::Asset)
    }

    /// URL segment of the resource collection
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Asset => "assets",
            ResourceKind::Equipment => "equipment",
            ResourceKind::Computer => "computers",
            ResourceKind::Monitor => "monitors",
            ResourceKind::Printer => "printers",
            ResourceKind::NetworkDevice => "network-devices",
        }
    }

    pub fn from_collection(segment: &str) -> Option<Self> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.collection() == segment)
    }
}

impl From<EquipmentKind> for ResourceKind {
    fn from(kind: EquipmentKind) -> Self {
        match kind {
            EquipmentKind::Equipment => ResourceKind::Equipment,
            EquipmentKind::Computer => ResourceKind::Computer,
            EquipmentKind::Monitor => ResourceKind::Monitor,
            EquipmentKind::Printer => ResourceKind::Printer,
            EquipmentKind::NetworkDevice => ResourceKind::NetworkDevice,
        }
    }
}

impl ResourceStatus {
    /// Statuses reachable through an explicit status change; `In Use` is
    /// only entered by a check-out.
    pub fn is_manual_target(&self) -> bool {
        !matches!(self, ResourceStatus::InUse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(ResourceStatus::InUse.as_str(), "In Use");
        assert_eq!("In Repair".parse::<ResourceStatus>(), Ok(ResourceStatus::InRepair));
        assert!("in use".parse::<ResourceStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ResourceStatus::InUse).unwrap(),
            "\"In Use\""
        );
    }

    #[test]
    fn test_equipment_kind_maps_to_tables() {
        for kind in EquipmentKind::ALL {
            let resource: ResourceKind = (*kind).into();
            assert_eq!(resource.as_str(), kind.as_str());
            assert!(!resource.soft_deletes());
        }
        assert_eq!(ResourceKind::from(EquipmentKind::NetworkDevice).table(), "network_devices");
        assert!(ResourceKind::Asset.soft_deletes());
    }

    #[test]
    fn test_asset_is_not_a_borrow_target() {
        let parsed: Result<EquipmentKind, _> = serde_json::from_str("\"asset\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_transition_labels() {
        assert_eq!(TransitionAction::CheckOut.to_string(), "Check-out");
        assert_eq!(TransitionAction::CheckIn.to_string(), "Check-in");
        assert!(!ResourceStatus::InUse.is_manual_target());
        assert!(ResourceStatus::Retired.is_manual_target());
    }

    #[test]
    fn test_collection_segments() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_collection(kind.collection()), Some(*kind));
        }
        assert_eq!(
            ResourceKind::from_collection("network-devices"),
            Some(ResourceKind::NetworkDevice)
        );
        assert_eq!(ResourceKind::from_collection("vendors"), None);
    }
}
