#[cfg(test)]
mod tests {
    use crate::core::transfer::{FORMAT_JSON, FORMAT_TEXT};
    use crate::core::{
        AppConfig, DragMode, DropError, EntityId, MemoryTransfer, Point, PointerSample, Rect,
        SURFACE_HEIGHT, SURFACE_WIDTH, TargetKind, TransferPayload, TransferSource, Workspace,
    };
    use chrono::{DateTime, TimeZone, Utc};

    const T0: i64 = 1_700_000_000_000;

    fn at(offset_ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(T0 + offset_ms).unwrap()
    }

    /// Workspace with the three targets laid out to the right of the surface
    fn workspace() -> Workspace {
        let mut ws = Workspace::sample(AppConfig::default());
        ws.set_target_bounds(
            TargetKind::CodeGenerator,
            Some(Rect::new(700.0, 0.0, 300.0, 200.0)),
        );
        ws.set_target_bounds(
            TargetKind::Documentation,
            Some(Rect::new(700.0, 220.0, 300.0, 200.0)),
        );
        ws.set_target_bounds(
            TargetKind::QueryBuilder,
            Some(Rect::new(700.0, 440.0, 300.0, 200.0)),
        );
        ws
    }

    const CODE_GENERATOR: Point = Point::new(850.0, 100.0);

    fn users_fields() -> Vec<String> {
        ["id (PK)", "username", "email", "created_at"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn drag_users_with_fallback(ws: &mut Workspace, offset_ms: i64) {
        ws.press(PointerSample::at(100.0, 100.0), at(offset_ms)).unwrap();
        ws.pointer_move(Point::new(400.0, 100.0));
        ws.pointer_move(CODE_GENERATOR);
        ws.release_over_targets(CODE_GENERATOR, at(offset_ms + 10));
    }

    // ========================================================================
    // Hit-testing
    // ========================================================================

    #[test]
    fn test_hit_test_is_unique_and_contains_point() {
        let ws = workspace();
        let diagram = ws.diagram();

        let mut y = 0.0;
        while y <= SURFACE_HEIGHT {
            let mut x = 0.0;
            while x <= SURFACE_WIDTH {
                let point = Point::new(x, y);
                let containing: Vec<_> = diagram
                    .entities()
                    .filter(|entity| entity.bounds.contains(point))
                    .map(|entity| entity.id)
                    .collect();
                let hit = diagram.entity_at(point).map(|entity| entity.id);

                assert!(containing.len() <= 1);
                assert_eq!(hit, containing.first().copied());
                assert_eq!(hit, diagram.entity_at(point).map(|entity| entity.id));
                x += 10.0;
            }
            y += 10.0;
        }
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    #[test]
    fn test_scenario_a_fallback_drop_on_code_generator() {
        let mut ws = workspace();
        drag_users_with_fallback(&mut ws, 0);

        let records = ws.records(TargetKind::CodeGenerator);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload.name, "Users");
        assert_eq!(records[0].payload.fields, users_fields());
        assert_eq!(records[0].target, TargetKind::CodeGenerator);
        assert_eq!(ws.targets().total_records(), 1);
        assert!(ws.controller().is_idle());
    }

    #[test]
    fn test_scenario_a_native_drop_on_code_generator() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();

        let mut channel = MemoryTransfer::new();
        ws.native_drag_start(&mut channel).unwrap();
        let record = ws
            .native_drop(TargetKind::CodeGenerator, &channel, at(50))
            .unwrap();
        ws.native_drag_end();

        assert_eq!(record.payload.name, "Users");
        assert_eq!(record.payload.fields, users_fields());
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 1);
        assert!(ws.controller().affordance().is_none());
    }

    #[test]
    fn test_scenario_b_press_outside_entities() {
        let mut ws = workspace();

        assert_eq!(
            ws.press(PointerSample::at(200.0, 20.0), at(0)).err(),
            Some(DropError::NoHit)
        );
        ws.pointer_move(CODE_GENERATOR);
        assert!(ws.release_over_targets(CODE_GENERATOR, at(10)).is_none());

        assert!(ws.controller().is_idle());
        assert_eq!(ws.targets().total_records(), 0);
    }

    #[test]
    fn test_scenario_c_demo_sequencer() {
        let mut ws = workspace();
        ws.start_demo(at(0));

        assert_eq!(ws.tick(at(0)), 1);
        assert_eq!(ws.tick(at(500)), 0);
        assert_eq!(ws.tick(at(1_000)), 1);
        assert_eq!(ws.next_due_ms(), Some(T0 + 2_000));
        assert_eq!(ws.tick(at(2_000)), 1);
        assert_eq!(ws.next_due_ms(), None);

        let code = ws.records(TargetKind::CodeGenerator);
        let docs = ws.records(TargetKind::Documentation);
        let query = ws.records(TargetKind::QueryBuilder);
        assert_eq!(code.len(), 1);
        assert_eq!(docs.len(), 1);
        assert_eq!(query.len(), 1);
        assert_eq!(code[0].payload.name, "Users");
        assert_eq!(docs[0].payload.name, "Orders");
        assert_eq!(query[0].payload.name, "Products");

        assert!(code[0].received_at < docs[0].received_at);
        assert!(docs[0].received_at < query[0].received_at);
        assert!(code[0].payload.timestamp < query[0].payload.timestamp);
    }

    #[test]
    fn test_scenario_c_late_tick_delivers_in_order() {
        let mut ws = workspace();
        ws.start_demo(at(0));

        assert_eq!(ws.tick(at(5_000)), 3);
        assert_eq!(ws.targets().total_records(), 3);
    }

    #[test]
    fn test_demo_uses_configured_step() {
        let mut ws = Workspace::sample(AppConfig {
            demo_step_ms: 200,
            ..AppConfig::default()
        });
        ws.start_demo(at(0));

        assert_eq!(ws.tick(at(400)), 3);
    }

    #[test]
    fn test_scenario_d_unrecognized_discriminator() {
        let mut ws = workspace();
        let channel = MemoryTransfer::new().with_data(
            FORMAT_JSON,
            r#"{"type":"kanban-card","entityId":1,"name":"Users","fields":[]}"#,
        );

        let result = ws.native_drop(TargetKind::Documentation, &channel, at(0));

        assert_eq!(
            result.err(),
            Some(DropError::WrongPayloadKind("kanban-card".to_string()))
        );
        assert!(ws.records(TargetKind::Documentation).is_empty());
        assert_eq!(ws.diagnostics().len(), 1);
    }

    #[test]
    fn test_malformed_native_drop_is_rejected() {
        let mut ws = workspace();
        let channel = MemoryTransfer::new().with_data(FORMAT_TEXT, "{broken");

        assert!(matches!(
            ws.native_drop(TargetKind::QueryBuilder, &channel, at(0)),
            Err(DropError::MalformedPayload(_))
        ));
        assert_eq!(ws.targets().total_records(), 0);
        assert_eq!(ws.diagnostics().len(), 1);
    }

    #[test]
    fn test_scenario_e_clear_then_drop_again() {
        let mut ws = workspace();
        for i in 0..3 {
            drag_users_with_fallback(&mut ws, i * 100);
        }
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 3);

        ws.clear(TargetKind::CodeGenerator);
        assert!(ws.records(TargetKind::CodeGenerator).is_empty());

        drag_users_with_fallback(&mut ws, 1_000);
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 1);
    }

    #[test]
    fn test_clear_empty_target_is_idempotent() {
        let mut ws = workspace();
        ws.clear(TargetKind::QueryBuilder);
        ws.clear(TargetKind::QueryBuilder);

        assert!(ws.records(TargetKind::QueryBuilder).is_empty());
    }

    // ========================================================================
    // At most one delivery per gesture
    // ========================================================================

    #[test]
    fn test_native_and_fallback_never_double_deliver() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        ws.pointer_move(Point::new(300.0, 100.0));

        let mut channel = MemoryTransfer::new();
        ws.native_drag_start(&mut channel).unwrap();
        ws.native_drop(TargetKind::CodeGenerator, &channel, at(20))
            .unwrap();
        // Some hosts also report the pointer release
        ws.release_over_targets(CODE_GENERATOR, at(30));
        ws.native_drag_end();

        assert_eq!(ws.targets().total_records(), 1);
    }

    #[test]
    fn test_repeated_native_drop_is_duplicate() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        let mut channel = MemoryTransfer::new();
        ws.native_drag_start(&mut channel).unwrap();

        ws.native_drop(TargetKind::CodeGenerator, &channel, at(10))
            .unwrap();
        let second = ws.native_drop(TargetKind::Documentation, &channel, at(11));

        assert!(matches!(second, Err(DropError::DuplicateDelivery(_))));
        assert_eq!(ws.targets().total_records(), 1);
        assert!(ws.records(TargetKind::Documentation).is_empty());
    }

    #[test]
    fn test_native_drop_after_fallback_delivery_is_duplicate() {
        let mut ws = workspace();
        let payload = ws
            .press(PointerSample::at(100.0, 100.0), at(0))
            .unwrap()
            .clone();
        ws.pointer_move(CODE_GENERATOR);
        assert!(ws.release_over_targets(CODE_GENERATOR, at(10)).is_some());

        // The host fires the native drop for the same gesture afterwards
        let channel = MemoryTransfer::new().with_data(FORMAT_JSON, payload.encode().unwrap());
        let late = ws.native_drop(TargetKind::CodeGenerator, &channel, at(20));

        assert!(matches!(late, Err(DropError::DuplicateDelivery(_))));
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 1);
        assert_eq!(payload.entity_id, EntityId(1));
    }

    #[test]
    fn test_external_native_drop_is_accepted() {
        let mut ws = workspace();
        let foreign = TransferPayload::from_entity(
            ws.diagram().entity(EntityId(4)).unwrap(),
            at(0),
        );
        let channel = MemoryTransfer::new().with_data(FORMAT_TEXT, foreign.encode().unwrap());

        let record = ws
            .native_drop(TargetKind::QueryBuilder, &channel, at(5))
            .unwrap();

        assert_eq!(record.payload.name, "OrderItems");
    }

    #[test]
    fn test_release_outside_targets_records_nothing() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        ws.pointer_move(Point::new(650.0, 100.0));

        assert!(ws.release_over_targets(Point::new(650.0, 100.0), at(10)).is_none());
        assert_eq!(ws.targets().total_records(), 0);
        assert!(ws.controller().affordance().is_none());
    }

    #[test]
    fn test_read_only_channel_still_delivers_once() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();

        let mut channel = MemoryTransfer::new().read_only();
        assert_eq!(ws.native_drag_start(&mut channel).unwrap(), DragMode::Fallback);

        // Нативный drag отменён хостом, жест продолжается указателем
        ws.pointer_move(Point::new(400.0, 100.0));
        ws.pointer_move(CODE_GENERATOR);
        let record = ws.release_over_targets(CODE_GENERATOR, at(10)).unwrap();

        assert_eq!(record.payload.name, "Users");
        assert_eq!(ws.targets().total_records(), 1);
        assert!(ws.controller().affordance().is_none());
    }

    #[test]
    fn test_empty_native_drop_does_not_block_fallback_release() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        let mut channel = MemoryTransfer::new().read_only();
        ws.native_drag_start(&mut channel).unwrap();
        ws.pointer_move(CODE_GENERATOR);

        assert!(matches!(
            ws.native_drop(TargetKind::CodeGenerator, &channel, at(5)),
            Err(DropError::MalformedPayload(_))
        ));
        assert!(ws.release_over_targets(CODE_GENERATOR, at(10)).is_some());
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 1);
    }

    #[test]
    fn test_focus_loss_mid_drag_leaves_no_ghost() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        ws.pointer_move(CODE_GENERATOR);
        ws.set_target_hovered(TargetKind::CodeGenerator, true);
        assert!(ws.controller().affordance().is_some_and(|a| a.visible));

        ws.abandon();

        assert!(ws.controller().affordance().is_none());
        assert!(!ws.targets().get(TargetKind::CodeGenerator).is_hovered());
        // mouseup вне окна приходит уже после отмены
        assert!(ws.release_over_targets(CODE_GENERATOR, at(10)).is_none());
        assert_eq!(ws.targets().total_records(), 0);
    }

    #[test]
    fn test_press_on_empty_space_drops_open_gesture() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        ws.pointer_move(Point::new(400.0, 500.0));

        assert!(ws.press(PointerSample::at(5.0, 5.0), at(10)).is_err());

        assert!(ws.controller().is_idle());
        assert!(ws.controller().affordance().is_none());
        assert!(ws.release_over_targets(CODE_GENERATOR, at(20)).is_none());
    }

    #[test]
    fn test_abandon_cleans_up() {
        let mut ws = workspace();
        ws.press(PointerSample::at(100.0, 100.0), at(0)).unwrap();
        ws.pointer_move(Point::new(300.0, 100.0));
        ws.set_target_hovered(TargetKind::Documentation, true);

        ws.abandon();

        assert!(ws.controller().is_idle());
        assert!(ws.controller().affordance().is_none());
        assert!(!ws.targets().get(TargetKind::Documentation).is_hovered());
        assert!(ws.release_over_targets(CODE_GENERATOR, at(10)).is_none());
    }

    // ========================================================================
    // Encodings
    // ========================================================================

    #[test]
    fn test_either_encoding_reproduces_entity() {
        for format in [FORMAT_JSON, FORMAT_TEXT] {
            let mut source = workspace();
            source.press(PointerSample::at(300.0, 100.0), at(0)).unwrap();
            let mut written = MemoryTransfer::new();
            source.native_drag_start(&mut written).unwrap();

            let only_one =
                MemoryTransfer::new().with_data(format, written.get_data(format).unwrap());

            let mut target = workspace();
            let record = target
                .native_drop(TargetKind::Documentation, &only_one, at(10))
                .unwrap();

            let orders = target.diagram().entity(EntityId(2)).unwrap();
            assert_eq!(record.payload.entity_id, orders.id);
            assert_eq!(record.payload.name, orders.name);
            assert_eq!(record.payload.fields, orders.fields);
        }
    }

    #[test]
    fn test_action_message_names_target_and_entity() {
        let mut ws = workspace();
        drag_users_with_fallback(&mut ws, 0);

        let message = ws.action_message(TargetKind::CodeGenerator, 0).unwrap();
        assert!(message.starts_with("Generate Code for \"Users\" table!"));
        assert!(message.contains("Fields: id (PK), username, email, created_at"));
        assert!(ws.action_message(TargetKind::CodeGenerator, 5).is_none());
        assert_eq!(ws.records(TargetKind::CodeGenerator).len(), 1);
    }
}
