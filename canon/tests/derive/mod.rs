mod r#enum;
mod r#struct;
