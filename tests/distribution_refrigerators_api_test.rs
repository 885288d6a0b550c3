// ==========================================
// 配送冰箱巡检 API 集成测试
// ==========================================
// 覆盖:
// - 两阶段写入: 聚合根 → 读数 → 故障
// - (机构, 配送) 唯一约束
// - 事务写入的回滚
// - 按 (机构, 配送) 读回
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod distribution_refrigerators_api_test {
    use lmis_logistics::logging;
    use lmis_logistics::{
        ApiError, DistributionRefrigerators, FunctioningStatus, Refrigerator,
        RefrigeratorProblem, RefrigeratorReading,
    };

    use crate::test_helpers::{create_test_state, seed_facility_and_distribution};

    #[test]
    fn test_two_phase_insert_round_trips() {
        logging::init_test();
        let (_temp_file, state) = create_test_state().unwrap();
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F10");
        let api = &state.distribution_refrigerators_api;

        let refrigerator = state
            .refrigerator_api
            .register(Refrigerator::new("SAM", "SAM", "LG", facility_id).with_audit(1))
            .unwrap();

        let reading = RefrigeratorReading::for_refrigerator(&refrigerator)
            .temperature(98.6)
            .functioning_correctly(FunctioningStatus::Yes);
        let aggregate =
            DistributionRefrigerators::new(facility_id, distribution_id, vec![reading.clone()]);

        // ===== 阶段1: 聚合根 =====
        let parent_id = api.insert(&aggregate).unwrap();

        // ===== 阶段2: 读数 + 故障 =====
        let reading_id = api
            .insert_reading(&reading.with_distribution_refrigerators_id(parent_id))
            .unwrap();
        api.insert_problems(&RefrigeratorProblem::new(
            Some(reading_id),
            true,
            false,
            true,
            false,
            true,
            false,
            Some("No Problem".to_string()),
        ))
        .unwrap();

        let saved = api.get_by(facility_id, distribution_id).unwrap();
        assert_eq!(saved.id, Some(parent_id));
        assert_eq!(saved.facility_id, facility_id);
        assert_eq!(saved.distribution_id, distribution_id);
        assert_eq!(saved.readings.len(), 1);

        let saved_reading = &saved.readings[0];
        assert_eq!(saved_reading.temperature, Some(98.6));
        let snapshot = saved_reading.refrigerator.as_ref().unwrap();
        assert_eq!(snapshot.serial_number, "SAM");
        assert_eq!(snapshot.brand.as_deref(), Some("SAM"));
        assert_eq!(snapshot.model.as_deref(), Some("LG"));

        let problem = saved_reading.problem.as_ref().unwrap();
        assert!(problem.gas_leakage);
        assert!(problem.operator_error);
        assert!(problem.thermostat_setting);
        assert!(!problem.burner_problem);
        assert!(!problem.egp_fault);
        assert!(!problem.other);
    }

    #[test]
    fn test_duplicate_pair_is_storage_error() {
        let (_temp_file, state) = create_test_state().unwrap();
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F11");
        let api = &state.distribution_refrigerators_api;

        let aggregate = DistributionRefrigerators::new(facility_id, distribution_id, vec![]);
        api.insert(&aggregate).unwrap();

        let err = api.insert(&aggregate).unwrap_err();
        assert!(matches!(err, ApiError::StorageError(_)));
    }

    #[test]
    fn test_reading_before_parent_is_rejected() {
        let (_temp_file, state) = create_test_state().unwrap();
        let api = &state.distribution_refrigerators_api;

        let err = api
            .insert_reading(&RefrigeratorReading::default().temperature(4.0))
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let err = api
            .insert_reading(
                &RefrigeratorReading::default()
                    .temperature(4.0)
                    .with_distribution_refrigerators_id(777),
            )
            .unwrap_err();
        assert!(err.is_storage_error());

        let err = api
            .insert_problems(&RefrigeratorProblem::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_get_by_missing_is_not_found() {
        let (_temp_file, state) = create_test_state().unwrap();
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F12");

        let err = state
            .distribution_refrigerators_api
            .get_by(facility_id, distribution_id)
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = state
            .distribution_refrigerators_api
            .get_by(0, distribution_id)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_save_validates_directories() {
        let (_temp_file, state) = create_test_state().unwrap();
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F13");
        let api = &state.distribution_refrigerators_api;

        let err = api
            .save(&DistributionRefrigerators::new(facility_id + 100, distribution_id, vec![]))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = api
            .save(&DistributionRefrigerators::new(facility_id, distribution_id + 100, vec![]))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_save_is_atomic() {
        let (_temp_file, state) = create_test_state().unwrap();
        let (facility_id, distribution_id) = seed_facility_and_distribution(&state, "F14");
        let api = &state.distribution_refrigerators_api;

        let problem = RefrigeratorProblem::new(None, false, false, true, false, false, false, None);
        let good = RefrigeratorReading::default()
            .temperature(6.5)
            .functioning_correctly(FunctioningStatus::No)
            .problem(problem.clone());

        // 同一 (机构, 配送) 再次写入: 聚合根冲突，读数与故障均不应落库
        let first = api
            .save(&DistributionRefrigerators::new(
                facility_id,
                distribution_id,
                vec![good.clone()],
            ))
            .unwrap();

        let err = api
            .save(&DistributionRefrigerators::new(
                facility_id,
                distribution_id,
                vec![good.clone(), good],
            ))
            .unwrap_err();
        assert!(err.is_storage_error());

        let saved = api.get_by(facility_id, distribution_id).unwrap();
        assert_eq!(saved.id, Some(first));
        assert_eq!(saved.readings.len(), 1);
        assert!(saved.readings[0].problem.as_ref().unwrap().gas_leakage);
        assert_eq!(
            saved.readings[0].functioning_correctly,
            Some(FunctioningStatus::No)
        );
    }
}
