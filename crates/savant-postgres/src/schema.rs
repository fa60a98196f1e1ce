// Maintained by hand; keep in sync with ./migrations.

pub mod sql_types {
    #[derive(diesel::query_builder::QueryId, diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "document_status"))]
    pub struct DocumentStatus;
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;
    use super::sql_types::DocumentStatus;

    documents (id) {
        id -> Uuid,
        account_id -> Uuid,
        savant_id -> Uuid,
        display_name -> Text,
        storage_path -> Text,
        mime_type -> Text,
        status -> DocumentStatus,
        chunk_count -> Int4,
        processing_error -> Nullable<Text>,
        processing_started_at -> Nullable<Timestamptz>,
        processing_completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    document_chunks (id) {
        id -> Uuid,
        account_id -> Uuid,
        savant_id -> Uuid,
        document_id -> Uuid,
        content -> Text,
        embedding -> Vector,
        chunk_index -> Int4,
        token_count -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(document_chunks -> documents (document_id));

diesel::allow_tables_to_appear_in_same_query!(document_chunks, documents);
