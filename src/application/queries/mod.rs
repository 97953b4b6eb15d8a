pub mod my_audit_logs_query;
