//! Per-resource table names, filters, update allow-lists and delete guards

use super::{
    changeset::changeset,
    query::FilterSet,
    resources::{DeleteGuard, Listable, Writable},
};
use crate::models::{
    agreement::{
        Contract, ContractQuery, CreateContract, CreateDomain, CreateSoftwareLicense, Domain,
        DomainQuery, SoftwareLicense, SoftwareLicenseQuery, UpdateContract, UpdateDomain,
        UpdateSoftwareLicense,
    },
    asset::{Asset, AssetQuery, CreateAsset, UpdateAsset},
    borrow_request::{BorrowRequest, BorrowRequestQuery},
    cartridge::{Cartridge, CartridgeQuery, CreateCartridge, UpdateCartridge},
    enums::ResourceKind,
    equipment::{
        Computer, CreateComputer, CreateEquipment, CreateMonitor, CreateNetworkDevice,
        CreatePrinter, Equipment, InventoryQuery, Monitor, NetworkDevice, Printer,
        UpdateComputer, UpdateEquipment, UpdateMonitor, UpdateNetworkDevice, UpdatePrinter,
    },
    lookup::{
        Category, CreateLocation, CreateNamed, CreateVendor, Location, LookupQuery, ProblemType,
        UpdateLocation, UpdateNamed, UpdateVendor, Vendor,
    },
    maintenance::{
        CreateMaintenanceSchedule, MaintenanceQuery, MaintenanceSchedule,
        UpdateMaintenanceSchedule,
    },
    transaction::{TransactionQuery, TransactionRecord},
};

// Assets

changeset!(CreateAsset {
    asset_tag, name, category_id, location_id, vendor_id, serial_number, model,
    purchase_date, purchase_cost, warranty_expiry, notes
});
changeset!(UpdateAsset {
    asset_tag, name, category_id, location_id, vendor_id, serial_number, model,
    purchase_date, purchase_cost, warranty_expiry, notes
});

impl Listable for Asset {
    const SOURCE: &'static str = "assets";
    const NAME: &'static str = "Asset";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    const SOFT_DELETE: bool = true;
    type Query = AssetQuery;

    fn filters(query: &AssetQuery) -> FilterSet {
        FilterSet::new()
            .condition("deleted_at IS NULL")
            .contains(
                &["name", "asset_tag", "serial_number", "model"],
                query.search.as_deref(),
            )
            .equals("status", query.status)
            .equals("category_id", query.category_id)
            .equals("location_id", query.location_id)
            .equals("vendor_id", query.vendor_id)
            .equals("assigned_to", query.assigned_to)
    }
}

impl Writable for Asset {
    type Create = CreateAsset;
    type Update = UpdateAsset;
    const TRACKABLE: bool = true;
}

// Equipment family

changeset!(CreateEquipment { name, equipment_type, serial_number, model, location_id, notes });
changeset!(UpdateEquipment { name, equipment_type, serial_number, model, location_id, notes });
changeset!(CreateComputer {
    name, hostname, operating_system, cpu, ram_gb, serial_number, model, location_id, notes
});
changeset!(UpdateComputer {
    name, hostname, operating_system, cpu, ram_gb, serial_number, model, location_id, notes
});
changeset!(CreateMonitor { name, size_inches, resolution, serial_number, model, location_id, notes });
changeset!(UpdateMonitor { name, size_inches, resolution, serial_number, model, location_id, notes });
changeset!(CreatePrinter { name, printer_type, ip_address, serial_number, model, location_id, notes });
changeset!(UpdatePrinter { name, printer_type, ip_address, serial_number, model, location_id, notes });
changeset!(CreateNetworkDevice {
    name, device_type, ip_address, mac_address, serial_number, model, location_id, notes
});
changeset!(UpdateNetworkDevice {
    name, device_type, ip_address, mac_address, serial_number, model, location_id, notes
});

/// Equipment kinds share the inventory filters and differ in table and
/// search columns.
macro_rules! inventory_resource {
    ($ty:ty, $create:ty, $update:ty, $table:literal, $name:literal, [$($search:literal),+]) => {
        impl Listable for $ty {
            const SOURCE: &'static str = $table;
            const NAME: &'static str = $name;
            const ORDER_BY: &'static str = "name, id";
            type Query = InventoryQuery;

            fn filters(query: &InventoryQuery) -> FilterSet {
                FilterSet::new()
                    .contains(&[$($search),+], query.search.as_deref())
                    .equals("status", query.status)
                    .equals("location_id", query.location_id)
                    .equals("assigned_to", query.assigned_to)
            }
        }

        impl Writable for $ty {
            type Create = $create;
            type Update = $update;
            const TRACKABLE: bool = true;
        }
    };
}

inventory_resource!(
    Equipment, CreateEquipment, UpdateEquipment, "equipment", "Equipment",
    ["name", "serial_number", "model", "equipment_type"]
);
inventory_resource!(
    Computer, CreateComputer, UpdateComputer, "computers", "Computer",
    ["name", "serial_number", "model", "hostname"]
);
inventory_resource!(
    Monitor, CreateMonitor, UpdateMonitor, "monitors", "Monitor",
    ["name", "serial_number", "model"]
);
inventory_resource!(
    Printer, CreatePrinter, UpdatePrinter, "printers", "Printer",
    ["name", "serial_number", "model", "ip_address"]
);
inventory_resource!(
    NetworkDevice, CreateNetworkDevice, UpdateNetworkDevice, "network_devices", "Network device",
    ["name", "serial_number", "model", "ip_address", "mac_address"]
);

// Agreements

changeset!(CreateContract {
    contract_number, title, vendor_id, start_date, end_date, value, status, notes
});
changeset!(UpdateContract {
    contract_number, title, vendor_id, start_date, end_date, value, status, notes
});

impl Listable for Contract {
    const SOURCE: &'static str = "contracts";
    const NAME: &'static str = "Contract";
    const ORDER_BY: &'static str = "end_date ASC NULLS LAST, id";
    type Query = ContractQuery;

    fn filters(query: &ContractQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["contract_number", "title"], query.search.as_deref())
            .equals("status", query.status.as_deref())
            .equals("vendor_id", query.vendor_id)
            .due_within_days("end_date", query.expiring_within_days)
    }
}

impl Writable for Contract {
    type Create = CreateContract;
    type Update = UpdateContract;
}

changeset!(CreateDomain {
    domain_name, registrar, registration_date, expiry_date, auto_renew, status, notes
});
changeset!(UpdateDomain {
    domain_name, registrar, registration_date, expiry_date, auto_renew, status, notes
});

impl Listable for Domain {
    const SOURCE: &'static str = "domains";
    const NAME: &'static str = "Domain";
    const ORDER_BY: &'static str = "expiry_date ASC NULLS LAST, id";
    type Query = DomainQuery;

    fn filters(query: &DomainQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["domain_name", "registrar"], query.search.as_deref())
            .equals("status", query.status.as_deref())
            .due_within_days("expiry_date", query.expiring_within_days)
            .equals("auto_renew", query.auto_renew)
    }
}

impl Writable for Domain {
    type Create = CreateDomain;
    type Update = UpdateDomain;
}

changeset!(CreateSoftwareLicense {
    software_name, license_key, vendor_id, seats_total, seats_used, purchase_date,
    expiry_date, cost, status, notes
});
changeset!(UpdateSoftwareLicense {
    software_name, license_key, vendor_id, seats_total, seats_used, purchase_date,
    expiry_date, cost, status, notes
});

impl Listable for SoftwareLicense {
    const SOURCE: &'static str = "software_licenses";
    const NAME: &'static str = "Software license";
    const ORDER_BY: &'static str = "software_name, id";
    type Query = SoftwareLicenseQuery;

    fn filters(query: &SoftwareLicenseQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["software_name", "license_key"], query.search.as_deref())
            .equals("status", query.status.as_deref())
            .equals("vendor_id", query.vendor_id)
            .due_within_days("expiry_date", query.expiring_within_days)
    }
}

impl Writable for SoftwareLicense {
    type Create = CreateSoftwareLicense;
    type Update = UpdateSoftwareLicense;
}

// Consumables

changeset!(CreateCartridge {
    name, model, color, compatible_printer, quantity, reorder_level, location_id, unit_cost, notes
});
changeset!(UpdateCartridge {
    name, model, color, compatible_printer, quantity, reorder_level, location_id, unit_cost, notes
});

impl Listable for Cartridge {
    const SOURCE: &'static str = "cartridges";
    const NAME: &'static str = "Cartridge";
    const ORDER_BY: &'static str = "name, id";
    type Query = CartridgeQuery;

    fn filters(query: &CartridgeQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["name", "model", "compatible_printer"], query.search.as_deref())
            .equals("location_id", query.location_id)
            .column_at_most("quantity", "reorder_level", query.low_stock.unwrap_or(false))
    }
}

impl Writable for Cartridge {
    type Create = CreateCartridge;
    type Update = UpdateCartridge;
}

// Lookups

changeset!(CreateVendor { name, contact_name, email, phone, website, notes });
changeset!(UpdateVendor { name, contact_name, email, phone, website, notes });
changeset!(CreateLocation { name, building, floor, room, description });
changeset!(UpdateLocation { name, building, floor, room, description });
changeset!(CreateNamed { name, description });
changeset!(UpdateNamed { name, description });

impl Listable for Vendor {
    const SOURCE: &'static str = "vendors";
    const NAME: &'static str = "Vendor";
    const ORDER_BY: &'static str = "name";
    type Query = LookupQuery;

    fn filters(query: &LookupQuery) -> FilterSet {
        FilterSet::new().contains(&["name", "contact_name", "email"], query.search.as_deref())
    }
}

impl Writable for Vendor {
    type Create = CreateVendor;
    type Update = UpdateVendor;
    const ADMIN_ONLY: bool = true;

    const DELETE_GUARDS: &'static [DeleteGuard] = &[
        DeleteGuard {
            sql: "SELECT EXISTS(SELECT 1 FROM assets WHERE vendor_id = $1 AND deleted_at IS NULL)",
            message: "Vendor is in use by one or more assets",
        },
        DeleteGuard {
            sql: "SELECT EXISTS(SELECT 1 FROM contracts WHERE vendor_id = $1 \
                  UNION ALL SELECT 1 FROM software_licenses WHERE vendor_id = $1)",
            message: "Vendor is referenced by contracts or software licenses",
        },
    ];
}

impl Listable for Location {
    const SOURCE: &'static str = "locations";
    const NAME: &'static str = "Location";
    const ORDER_BY: &'static str = "name";
    type Query = LookupQuery;

    fn filters(query: &LookupQuery) -> FilterSet {
        FilterSet::new().contains(&["name", "building"], query.search.as_deref())
    }
}

impl Writable for Location {
    type Create = CreateLocation;
    type Update = UpdateLocation;
    const ADMIN_ONLY: bool = true;

    const DELETE_GUARDS: &'static [DeleteGuard] = &[
        DeleteGuard {
            sql: "SELECT EXISTS(SELECT 1 FROM assets WHERE location_id = $1 AND deleted_at IS NULL)",
            message: "Location is in use by one or more assets",
        },
        DeleteGuard {
            sql: "SELECT EXISTS(\
                  SELECT 1 FROM equipment WHERE location_id = $1 \
                  UNION ALL SELECT 1 FROM computers WHERE location_id = $1 \
                  UNION ALL SELECT 1 FROM monitors WHERE location_id = $1 \
                  UNION ALL SELECT 1 FROM printers WHERE location_id = $1 \
                  UNION ALL SELECT 1 FROM network_devices WHERE location_id = $1)",
            message: "Location is in use by one or more equipment items",
        },
        DeleteGuard {
            sql: "SELECT EXISTS(\
                  SELECT 1 FROM transactions WHERE location_id = $1 \
                  UNION ALL SELECT 1 FROM borrow_requests WHERE location_id = $1)",
            message: "Location is referenced by transaction history or borrow requests",
        },
    ];
}

impl Listable for Category {
    const SOURCE: &'static str = "categories";
    const NAME: &'static str = "Category";
    const ORDER_BY: &'static str = "name";
    type Query = LookupQuery;

    fn filters(query: &LookupQuery) -> FilterSet {
        FilterSet::new().contains(&["name"], query.search.as_deref())
    }
}

impl Writable for Category {
    type Create = CreateNamed;
    type Update = UpdateNamed;
    const ADMIN_ONLY: bool = true;

    const DELETE_GUARDS: &'static [DeleteGuard] = &[DeleteGuard {
        sql: "SELECT EXISTS(SELECT 1 FROM assets WHERE category_id = $1 AND deleted_at IS NULL)",
        message: "Category is in use by one or more assets",
    }];
}

impl Listable for ProblemType {
    const SOURCE: &'static str = "problem_types";
    const NAME: &'static str = "Problem type";
    const ORDER_BY: &'static str = "name";
    type Query = LookupQuery;

    fn filters(query: &LookupQuery) -> FilterSet {
        FilterSet::new().contains(&["name"], query.search.as_deref())
    }
}

impl Writable for ProblemType {
    type Create = CreateNamed;
    type Update = UpdateNamed;
    const ADMIN_ONLY: bool = true;
}

// Maintenance

changeset!(CreateMaintenanceSchedule {
    title, resource_kind, resource_id, interval_days, next_due_date, active, notes
});
changeset!(UpdateMaintenanceSchedule { title, interval_days, next_due_date, active, notes });

impl Listable for MaintenanceSchedule {
    const SOURCE: &'static str = "maintenance_schedules";
    const NAME: &'static str = "Maintenance schedule";
    const ORDER_BY: &'static str = "next_due_date, id";
    type Query = MaintenanceQuery;

    fn filters(query: &MaintenanceQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["title"], query.search.as_deref())
            .equals("resource_kind", query.resource_kind)
            .equals("resource_id", query.resource_id)
            .equals("active", query.active)
            .due_within_days("next_due_date", query.due_within_days)
    }
}

impl Writable for MaintenanceSchedule {
    type Create = CreateMaintenanceSchedule;
    type Update = UpdateMaintenanceSchedule;

    fn referenced_resource(data: &CreateMaintenanceSchedule) -> Option<(ResourceKind, i32)> {
        Some((data.resource_kind, data.resource_id))
    }
}

// Read-only logs and projections

impl Listable for TransactionRecord {
    const SOURCE: &'static str = "transactions";
    const NAME: &'static str = "Transaction";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    type Query = TransactionQuery;

    fn filters(query: &TransactionQuery) -> FilterSet {
        FilterSet::new()
            .equals("resource_kind", query.resource_kind)
            .equals("resource_id", query.resource_id)
            .equals("action", query.action)
            .equals("performed_by", query.performed_by)
            .at_least("created_at::date", query.performed_from)
            .at_most("created_at::date", query.performed_until)
    }
}

impl Listable for BorrowRequest {
    const SOURCE: &'static str = "borrow_request_status";
    const NAME: &'static str = "Borrow request";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    type Query = BorrowRequestQuery;

    fn filters(query: &BorrowRequestQuery) -> FilterSet {
        FilterSet::new()
            .contains(&["purpose"], query.search.as_deref())
            .equals("status", query.status)
            .equals("target_kind", query.target_kind)
            .equals("target_id", query.target_id)
            .equals("requester_id", query.requester_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{enums::ResourceStatus, pagination::PageRequest},
        repository::{changeset::Changeset, query::ListQuery, sql::SqlValue},
    };

    fn page() -> PageRequest {
        PageRequest { page: 1, limit: 25 }
    }

    #[test]
    fn test_asset_list_always_excludes_deleted() {
        let built = ListQuery::new(
            Asset::SOURCE,
            Asset::filters(&AssetQuery::default()),
            Asset::ORDER_BY,
            page(),
        )
        .build();
        assert_eq!(
            built.count_sql,
            "SELECT COUNT(*) FROM assets WHERE deleted_at IS NULL"
        );
    }

    #[test]
    fn test_asset_filters_bind_in_order() {
        let query = AssetQuery {
            search: Some("dell".to_string()),
            status: Some(ResourceStatus::InUse),
            location_id: Some(3),
            ..Default::default()
        };
        let built = ListQuery::new(Asset::SOURCE, Asset::filters(&query), Asset::ORDER_BY, page())
            .build();
        assert_eq!(
            built.count_sql,
            "SELECT COUNT(*) FROM assets WHERE deleted_at IS NULL AND \
             (name ILIKE $1 OR asset_tag ILIKE $1 OR serial_number ILIKE $1 OR model ILIKE $1) \
             AND status = $2 AND location_id = $3"
        );
        assert_eq!(
            built.params,
            vec![
                SqlValue::Text("%dell%".to_string()),
                SqlValue::Text("In Use".to_string()),
                SqlValue::Int(3),
            ]
        );
        assert!(built.select_sql.ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn test_low_stock_is_part_of_the_count() {
        let query = CartridgeQuery {
            low_stock: Some(true),
            ..Default::default()
        };
        let built = ListQuery::new(
            Cartridge::SOURCE,
            Cartridge::filters(&query),
            Cartridge::ORDER_BY,
            page(),
        )
        .build();
        assert_eq!(
            built.count_sql,
            "SELECT COUNT(*) FROM cartridges WHERE quantity <= reorder_level"
        );
        assert!(built.params.is_empty());
    }

    #[test]
    fn test_lookup_without_search_has_no_where() {
        let filters = Vendor::filters(&LookupQuery { search: Some("  ".to_string()) });
        assert!(filters.is_empty());
    }

    #[test]
    fn test_update_allow_lists_never_touch_status() {
        let update = UpdateComputer {
            name: Some("ws-042".to_string()),
            ram_gb: Some(32),
            ..Default::default()
        };
        let columns: Vec<&str> = update.changes().into_iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["name", "ram_gb"]);
        assert!(UpdateAsset::default().changes().is_empty());
    }

    #[test]
    fn test_expiring_contracts_filter() {
        let query = ContractQuery {
            expiring_within_days: Some(30),
            ..Default::default()
        };
        let (clause, params) = Contract::filters(&query).where_clause(1);
        assert_eq!(clause, " WHERE end_date <= CURRENT_DATE + $1::int");
        assert_eq!(params, vec![SqlValue::Int(30)]);
    }

    #[test]
    fn test_schedules_reference_their_resource() {
        let body = CreateMaintenanceSchedule {
            title: "Toner check".to_string(),
            resource_kind: ResourceKind::Printer,
            resource_id: 12,
            interval_days: 90,
            next_due_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            active: None,
            notes: None,
        };
        assert_eq!(
            MaintenanceSchedule::referenced_resource(&body),
            Some((ResourceKind::Printer, 12))
        );
        let vendor = CreateVendor {
            name: "Acme".to_string(),
            contact_name: None,
            email: None,
            phone: None,
            website: None,
            notes: None,
        };
        assert_eq!(Vendor::referenced_resource(&vendor), None);
    }

    #[test]
    fn test_transaction_date_window() {
        let query = TransactionQuery {
            resource_kind: Some(ResourceKind::Computer),
            performed_from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            performed_until: chrono::NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let (clause, params) = TransactionRecord::filters(&query).where_clause(1);
        assert_eq!(
            clause,
            " WHERE resource_kind = $1 AND created_at::date >= $2 AND created_at::date <= $3"
        );
        assert_eq!(params.len(), 3);

        let (clause, _) = TransactionRecord::filters(&TransactionQuery::default()).where_clause(1);
        assert!(clause.is_empty());
    }

    #[test]
    fn test_location_guards_cover_history() {
        let sql: Vec<&str> = Location::DELETE_GUARDS.iter().map(|g| g.sql).collect();
        assert!(sql.iter().any(|s| s.contains("FROM transactions WHERE location_id = $1")));
        assert!(sql.iter().any(|s| s.contains("FROM borrow_requests WHERE location_id = $1")));
    }

    #[test]
    fn test_trackable_and_admin_flags() {
        assert!(Asset::TRACKABLE && NetworkDevice::TRACKABLE && Equipment::TRACKABLE);
        assert!(!Cartridge::TRACKABLE && !Location::TRACKABLE);
        assert!(Location::ADMIN_ONLY);
        assert!(!Computer::ADMIN_ONLY);
    }
}
