#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::*;

    const HEADER: &str = r##"{
        "wrapper": "header#site-header.sticky.top-0",
        "data": {"shop_name": "Acme"},
        "blocks": [
            {"wrapper": "a.logo", "bind_content": "shop_name", "href": "/"},
            {
                "wrapper": "button.cart-btn",
                "events": {"on_click": {"action": "toggle_drawer", "target": "cart_drawer"}},
                "blocks": [{"type": "icon", "icon": "shopping-cart"}]
            },
            {
                "wrapper": "div#cart_drawer",
                "state": {"visible": false},
                "condition": {"field": "cart_count", "op": "gt", "value": 0}
            },
            {
                "type": "swiper",
                "wrapper": "div#hero-1-swiper-main",
                "config": {"slidesPerView": 1, "loop": true, "autoplay": {"delay": 4000}},
                "blocks": [
                    {"type": "repeater", "source": "slides", "iterator": "slide",
                     "template": {"wrapper": "img", "bind_src": "slide.image"}}
                ]
            }
        ]
    }"##;

    #[test]
    fn full_header_parses() {
        let root = load_block_from_str(HEADER).unwrap();
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.declared_id().as_deref(), Some("site-header"));
        assert_eq!(root.data.get("shop_name"), Some(&Value::from("Acme")));

        let cart = &root.children[1];
        assert_eq!(
            cart.click_action(),
            Some(&Action::ToggleDrawer {
                target: "cart_drawer".into()
            })
        );
        assert!(cart.children[0].is_icon());

        let drawer = &root.children[2];
        assert_eq!(drawer.declared_visibility(), Some(false));
        let cond = drawer.condition.as_ref().unwrap();
        assert_eq!(cond.op, Operator::Gt);
        assert_eq!(cond.value, Some(Value::from(0)));

        let BlockKind::Carousel(cfg) = &root.children[3].kind else {
            panic!("expected a carousel");
        };
        let opts = cfg.resolve(DEFAULT_AUTOPLAY_DELAY_MS);
        assert!(opts.looped);
        assert_eq!(opts.autoplay.map(|a| a.delay_ms), Some(4000));
        assert!(matches!(root.children[3].children[0].kind, BlockKind::Repeater(_)));
    }

    #[test]
    fn condition_value_null_vs_missing() {
        let b = load_block_from_str(r#"{"condition": {"field": "x", "op": "equals", "value": null}}"#)
            .unwrap();
        assert_eq!(b.condition.unwrap().value, Some(Value::Null));
        let b = load_block_from_str(r#"{"condition": {"field": "x", "op": "not_empty"}}"#).unwrap();
        assert_eq!(b.condition.unwrap().value, None);
    }

    #[test]
    fn unknown_operator_is_kept() {
        let b = load_block_from_str(r#"{"condition": {"field": "x", "op": "between"}}"#).unwrap();
        assert_eq!(b.condition.unwrap().op, Operator::Unknown("between".into()));
    }

    #[test]
    fn unknown_action_is_kept() {
        let b = load_block_from_str(r#"{"events": {"on_click": {"action": "teleport"}}}"#).unwrap();
        assert_eq!(
            b.click_action(),
            Some(&Action::Unknown {
                action: "teleport".into()
            })
        );
    }

    #[test]
    fn syntax_error_has_excerpt() {
        let err = load_block_from_str("{\n  \"wrapper\": \"div\",\n  oops\n}").unwrap_err();
        match &err {
            Error::Parse { line, excerpt, .. } => {
                assert_eq!(*line, 3);
                assert!(excerpt.contains('^'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.pretty().starts_with("Parse error at line 3"));
    }

    #[test]
    fn blocks_accept_object_or_list() {
        assert_eq!(load_blocks_from_str(r#"{"wrapper": "div"}"#).unwrap().len(), 1);
        assert_eq!(
            load_blocks_from_str(r#"[{"wrapper": "div"}, {"wrapper": "p"}]"#)
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            load_blocks_from_str("42").unwrap_err(),
            Error::Invalid { .. }
        ));
    }

    #[test]
    fn data_root_must_be_object() {
        assert!(load_data_from_str(r#"{"cart_count": 3}"#).is_ok());
        let err = load_data_from_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
        assert!(err.pretty().contains("an array"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_blocks_from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.path().is_some());
    }
}
