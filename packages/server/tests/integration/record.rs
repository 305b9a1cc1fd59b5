use crate::common::{TestApp, routes};

mod record_create {
    use super::*;

    #[tokio::test]
    async fn create_returns_the_record_with_empty_image_fields() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "サトウ ハナコ").await;

        let res = app
            .post(
                routes::RECORDS,
                &serde_json::json!({
                    "customer_id": customer_id,
                    "treatment_date": "2026-04-01",
                    "memo": "  カット & カラー  ",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.data()["customer_id"].as_str().unwrap(), customer_id);
        assert_eq!(res.data()["treatment_date"].as_str().unwrap(), "2026-04-01");
        // The memo is stored trimmed.
        assert_eq!(res.data()["memo"].as_str().unwrap(), "カット & カラー");
        assert_eq!(res.data()["before_image_key"].as_str().unwrap(), "");
        assert_eq!(res.data()["after_image_key"].as_str().unwrap(), "");
        assert_eq!(res.data()["before_media_id"].as_str().unwrap(), "");
        assert_eq!(res.data()["after_media_id"].as_str().unwrap(), "");
    }

    #[tokio::test]
    async fn customer_id_and_treatment_date_are_required() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;

        let res = app
            .post(
                routes::RECORDS,
                &serde_json::json!({ "treatment_date": "2026-04-01" }),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "customer_id is required");

        let res = app
            .post(routes::RECORDS, &serde_json::json!({ "customer_id": customer_id }))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "treatment_date is required");
    }

    #[tokio::test]
    async fn create_against_a_missing_customer_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::RECORDS,
                &serde_json::json!({
                    "customer_id": "01890000-0000-7000-8000-000000000000",
                    "treatment_date": "2026-04-01",
                }),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Customer not found");
    }
}

mod record_list {
    use super::*;

    #[tokio::test]
    async fn list_requires_customer_id() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::RECORDS).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "customer_id is required");
    }

    #[tokio::test]
    async fn unknown_or_malformed_customer_id_yields_an_empty_list() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::records_for("01890000-0000-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data().as_array().unwrap().len(), 0);

        let res = app.get(&routes::records_for("not-a-uuid")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.data().as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn records_are_ordered_by_date_then_creation_descending() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;

        let old = app.create_record(&customer_id, "2026-01-05").await;
        let tied_first = app.create_record(&customer_id, "2026-03-01").await;
        let tied_second = app.create_record(&customer_id, "2026-03-01").await;
        let newest = app.create_record(&customer_id, "2026-05-20").await;

        let res = app.get(&routes::records_for(&customer_id)).await;
        assert_eq!(res.status, 200);
        let ids: Vec<&str> = res
            .data()
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        // Newest date first; within a date, the later-created record first.
        assert_eq!(ids, vec![newest, tied_second, tied_first, old]);
    }

    #[tokio::test]
    async fn records_of_other_customers_are_not_included() {
        let app = TestApp::spawn().await;
        let a = app.create_customer("佐藤 花子", "").await;
        let b = app.create_customer("鈴木 太郎", "").await;
        app.create_record(&a, "2026-01-01").await;
        let b_record = app.create_record(&b, "2026-01-02").await;

        let res = app.get(&routes::records_for(&b)).await;
        let list = res.data().as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"].as_str().unwrap(), b_record);
    }
}

mod record_detail {
    use super::*;

    #[tokio::test]
    async fn detail_has_null_display_keys_when_nothing_is_set() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;
        let record_id = app.create_record(&customer_id, "2026-04-01").await;

        let res = app.get(&routes::record(&record_id)).await;
        assert_eq!(res.status, 200);
        assert!(res.data()["before_display_key"].is_null());
        assert!(res.data()["after_display_key"].is_null());
    }

    #[tokio::test]
    async fn detail_falls_back_to_the_legacy_image_key() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;
        let record_id = app.create_record(&customer_id, "2026-04-01").await;

        let res = app
            .upload_image(&record_id, "before", "b.webp", b"img".to_vec(), "image/webp")
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let key = res.data()["key"].as_str().unwrap().to_string();

        let res = app.get(&routes::record(&record_id)).await;
        assert_eq!(res.data()["before_image_key"].as_str().unwrap(), key);
        assert_eq!(res.data()["before_display_key"].as_str().unwrap(), key);
        assert!(res.data()["after_display_key"].is_null());
    }

    #[tokio::test]
    async fn get_unknown_record_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::record("01890000-0000-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Record not found");
    }
}

mod record_update {
    use super::*;

    #[tokio::test]
    async fn update_with_only_memo_preserves_the_date() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;
        let record_id = app.create_record(&customer_id, "2026-04-01").await;

        let res = app
            .put(
                &routes::record(&record_id),
                &serde_json::json!({ "memo": "トリートメント追加" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["treatment_date"].as_str().unwrap(), "2026-04-01");
        assert_eq!(res.data()["memo"].as_str().unwrap(), "トリートメント追加");
    }

    #[tokio::test]
    async fn update_unknown_record_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put(
                &routes::record("01890000-0000-7000-8000-000000000000"),
                &serde_json::json!({ "memo": "x" }),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Record not found");
    }
}

mod record_delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_record_its_media_and_their_blobs() {
        let app = TestApp::spawn().await;
        let customer_id = app.create_customer("佐藤 花子", "").await;
        let record_id = app.create_record(&customer_id, "2026-04-01").await;
        app.upload_photo(&record_id, "cut.webp").await;

        let media = app.get(&routes::media_list(&record_id)).await;
        let key = media.data()[0]["storage_key"].as_str().unwrap().to_string();

        let res = app.delete(&routes::record(&record_id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.data()["id"].as_str().unwrap(), record_id);

        assert_eq!(app.get(&routes::record(&record_id)).await.status, 404);
        let media = app.get(&routes::media_list(&record_id)).await;
        assert_eq!(media.data().as_array().unwrap().len(), 0);
        let (status, _, _, _) = app.get_bytes(&routes::image(&key)).await;
        assert_eq!(status, 404);

        // The owning customer is untouched.
        let customer = app.get(&routes::customer(&customer_id)).await;
        assert_eq!(customer.status, 200);
        assert_eq!(customer.data()["record_count"].as_i64().unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_record_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .delete(&routes::record("01890000-0000-7000-8000-000000000000"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Record not found");
    }
}
