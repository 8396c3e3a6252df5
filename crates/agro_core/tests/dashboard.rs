use agro_core::model::crop::CropInput;
use agro_core::model::crop_type::CropTypeInput;
use agro_core::model::farm::{Farm, FarmInput};
use agro_core::model::farmer::{Farmer, FarmerInput};
use agro_core::repo::crop_repo::SqliteCropRepository;
use agro_core::repo::crop_type_repo::SqliteCropTypeRepository;
use agro_core::repo::farm_repo::SqliteFarmRepository;
use agro_core::repo::farmer_repo::SqliteFarmerRepository;
use agro_core::repo::report_repo::SqliteReportRepository;
use agro_core::service::crop_service::CropService;
use agro_core::service::crop_type_service::CropTypeService;
use agro_core::service::farm_service::FarmService;
use agro_core::service::farmer_service::FarmerService;
use agro_core::{open_db_in_memory, DashboardService, DashboardSnapshot, StateCode};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

fn snapshot(conn: &Connection) -> DashboardSnapshot {
    DashboardService::new(SqliteReportRepository::try_new(conn).unwrap())
        .snapshot()
        .unwrap()
}

fn seed_farmer(conn: &Connection) -> Farmer {
    FarmerService::new(SqliteFarmerRepository::try_new(conn).unwrap())
        .create_farmer(&FarmerInput {
            document: Some("52998224725".to_string()),
            name: Some("Carla".to_string()),
        })
        .unwrap()
}

fn seed_farm(conn: &Connection, farmer: &Farmer, state: &str, total: i64, arable: i64) -> Farm {
    FarmService::new(
        SqliteFarmRepository::try_new(conn).unwrap(),
        SqliteFarmerRepository::try_new(conn).unwrap(),
    )
    .create_farm(&FarmInput {
        farmer_id: Some(farmer.id),
        name: Some(format!("Fazenda {state}")),
        city: Some("Cidade".to_string()),
        state: Some(state.to_string()),
        total_area_hectares: Some(Decimal::new(total, 0)),
        arable_area_hectares: Some(Decimal::new(arable, 0)),
        vegetation_area_hectares: Some(Decimal::new(total - arable, 0)),
    })
    .unwrap()
}

fn plant(conn: &Connection, farm: &Farm, crop_type_id: i64) {
    CropService::new(
        SqliteCropRepository::try_new(conn).unwrap(),
        SqliteFarmRepository::try_new(conn).unwrap(),
        SqliteCropTypeRepository::try_new(conn).unwrap(),
    )
    .create_crop(&CropInput {
        farm_id: Some(farm.id),
        crop_type_id: Some(crop_type_id),
    })
    .unwrap();
}

fn crop_type(conn: &Connection, name: &str) -> i64 {
    CropTypeService::new(SqliteCropTypeRepository::try_new(conn).unwrap())
        .create_crop_type(&CropTypeInput {
            name: Some(name.to_string()),
        })
        .unwrap()
        .id
}

#[test]
fn empty_store_yields_zeroes() {
    let conn = open_db_in_memory().unwrap();
    let snapshot = snapshot(&conn);

    assert_eq!(snapshot.farm_count, 0);
    assert_eq!(snapshot.total_area_hectares, Decimal::ZERO);
    assert!(snapshot.count_by_state.is_empty());
    assert!(snapshot.farm_count_by_crop.is_empty());
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        json!({
            "farm_count": 0,
            "total_area_hectares": 0.0,
            "soil_usage": {
                "total_arable_area_hectares": 0.0,
                "total_vegetation_area_hectares": 0.0
            },
            "farm_count_by_crop": [],
            "count_by_state": []
        })
    );
}

#[test]
fn two_farms_in_two_states() {
    let conn = open_db_in_memory().unwrap();
    let farmer = seed_farmer(&conn);
    let bahia = seed_farm(&conn, &farmer, "BA", 100, 60);
    let minas = seed_farm(&conn, &farmer, "MG", 200, 150);
    let soja = crop_type(&conn, "Soja");
    let cafe = crop_type(&conn, "Café");
    plant(&conn, &bahia, soja);
    plant(&conn, &minas, soja);
    plant(&conn, &minas, cafe);

    let snapshot = snapshot(&conn);
    assert_eq!(snapshot.farm_count, 2);
    assert_eq!(snapshot.total_area_hectares, Decimal::new(300, 0));
    assert_eq!(snapshot.soil_usage.total_arable_area_hectares, Decimal::new(210, 0));
    assert_eq!(snapshot.soil_usage.total_vegetation_area_hectares, Decimal::new(90, 0));

    let states: Vec<(StateCode, u64)> = snapshot
        .count_by_state
        .iter()
        .map(|item| (item.state, item.total))
        .collect();
    assert_eq!(states, [(StateCode::Ba, 1), (StateCode::Mg, 1)]);

    let by_crop = serde_json::to_value(&snapshot.farm_count_by_crop).unwrap();
    assert_eq!(
        by_crop,
        json!([
            {"crop_type_name": "Café", "total": 1},
            {"crop_type_name": "Soja", "total": 2}
        ])
    );
}

#[test]
fn fractional_areas_sum_exactly() {
    let conn = open_db_in_memory().unwrap();
    let farmer = seed_farmer(&conn);
    for total in ["0.10", "0.20"] {
        FarmService::new(
            SqliteFarmRepository::try_new(&conn).unwrap(),
            SqliteFarmerRepository::try_new(&conn).unwrap(),
        )
        .create_farm(&FarmInput {
            farmer_id: Some(farmer.id),
            name: Some("Sitio".to_string()),
            city: Some("Cidade".to_string()),
            state: Some("SP".to_string()),
            total_area_hectares: Some(total.parse().unwrap()),
            arable_area_hectares: Some(Decimal::ZERO),
            vegetation_area_hectares: Some(Decimal::ZERO),
        })
        .unwrap();
    }

    let snapshot = snapshot(&conn);
    assert_eq!(snapshot.total_area_hectares, Decimal::new(30, 2));
    assert_eq!(snapshot.count_by_state[0].total, 2);
}

#[test]
fn every_state_is_counted_separately() {
    let conn = open_db_in_memory().unwrap();
    let farmer = seed_farmer(&conn);
    for state in StateCode::all() {
        seed_farm(&conn, &farmer, state.code(), 10, 5);
    }

    let snapshot = snapshot(&conn);
    assert_eq!(snapshot.farm_count, 27);
    assert_eq!(snapshot.count_by_state.len(), 27);
    assert!(snapshot.count_by_state.iter().all(|item| item.total == 1));

    let codes: Vec<&str> = snapshot.count_by_state.iter().map(|i| i.state.code()).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted);
}
