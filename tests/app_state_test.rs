// ==========================================
// AppState 装配测试
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod app_state_test {
    use lmis_logistics::config::AppConfig;
    use lmis_logistics::db::CURRENT_SCHEMA_VERSION;
    use lmis_logistics::{AppState, DistributionRefrigerators, Refrigerator};

    use crate::test_helpers::{create_test_state, seed_facility_and_distribution};

    #[test]
    fn test_state_initializes_schema() {
        let (_temp_file, state) = create_test_state().unwrap();
        assert_eq!(state.schema_version().unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_new_creates_missing_db_dir() {
        let root = tempfile::tempdir().unwrap();
        let db_path = root.path().join("nested").join("lmis.db");
        let config = AppConfig {
            db_path: db_path.to_str().unwrap().to_string(),
            busy_timeout_ms: 1_000,
            log_filter: "info".to_string(),
            log_json: false,
        };

        let state = AppState::new(&config).unwrap();
        assert_eq!(state.schema_version().unwrap(), Some(CURRENT_SCHEMA_VERSION));
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let (temp_file, state) = create_test_state().unwrap();
        let (facility_id, _) = seed_facility_and_distribution(&state, "F20");
        state
            .refrigerator_api
            .register(Refrigerator::new("SN-9", "Dometic", "TCW3000", facility_id))
            .unwrap();
        drop(state);

        let config = AppConfig {
            db_path: temp_file.path().to_str().unwrap().to_string(),
            busy_timeout_ms: 1_000,
            log_filter: "info".to_string(),
            log_json: false,
        };
        let reopened = AppState::new(&config).unwrap();
        let refrigerators = reopened
            .refrigerator_api
            .list_by_facility(facility_id)
            .unwrap();
        assert_eq!(refrigerators.len(), 1);
        assert_eq!(refrigerators[0].serial_number, "SN-9");

        let found = reopened
            .refrigerator_api
            .get_by_serial_number(facility_id, "SN-9")
            .unwrap();
        assert_eq!(found.model.as_deref(), Some("TCW3000"));
    }

    #[test]
    fn test_from_in_memory_connection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let state = AppState::from_connection(":memory:".to_string(), conn).unwrap();
        assert_eq!(state.schema_version().unwrap(), Some(CURRENT_SCHEMA_VERSION));

        // 外键在传入连接上已开启
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F21");
        let err = state
            .distribution_refrigerators_api
            .insert(&DistributionRefrigerators::new(facility_id, distribution_id + 50, vec![]))
            .unwrap_err();
        assert!(err.is_storage_error());
    }
}
