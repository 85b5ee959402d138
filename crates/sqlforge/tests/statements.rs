//! End-to-end statement tests through the derive macro and a mock adapter.

use chrono::{NaiveDate, NaiveDateTime};
use sqlforge::{
    delete, insert, select, update, Adapter, Condition, Config, Entity, ForgeError, ForgeResult,
    Value,
};
use std::sync::{Arc, Mutex};

#[derive(Entity, Clone, Debug, PartialEq)]
#[entity(table = "user")]
struct User {
    #[field(id)]
    id: i32,
    name: String,
    age: i32,
    phone: String,
    #[field(column = "create_date")]
    created: NaiveDateTime,
    status: i32,
}

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 5)
        .unwrap()
}

fn user() -> User {
    User {
        id: 5,
        name: "Mike".into(),
        age: 18,
        phone: "78231234".into(),
        created: created(),
        status: 2,
    }
}

/// Records every call and replays canned rows.
#[derive(Default)]
struct MockAdapter {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Mutex<Vec<Vec<Value>>>,
    fail: bool,
}

impl MockAdapter {
    fn with_rows(rows: Vec<Vec<Value>>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Self::default()
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    fn last_call(&self) -> (String, Vec<Value>) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

impl Adapter for MockAdapter {
    fn exec(&self, sql: &str, values: &[Value]) -> ForgeResult<u64> {
        if self.fail {
            return Err(ForgeError::adapter(std::io::Error::other("gone away")));
        }
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), values.to_vec()));
        Ok(1)
    }

    fn query(&self, sql: &str, values: &[Value]) -> ForgeResult<Vec<Vec<Value>>> {
        if self.fail {
            return Err(ForgeError::adapter(std::io::Error::other("gone away")));
        }
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), values.to_vec()));
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[test]
fn derive_reports_declaration_order_and_mapping() {
    let stmt = insert(user()).assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "INSERT INTO `user`(`id`,`name`,`age`,`phone`,`create_date`,`status`) VALUES(?,?,?,?,?,?)"
    );
    assert_eq!(
        stmt.values(),
        vec![
            Value::Int(5),
            Value::from("Mike"),
            Value::Int(18),
            Value::from("78231234"),
            Value::from(created()),
            Value::Int(2),
        ]
    );
}

#[test]
fn derive_defaults_table_to_snake_cased_struct_name() {
    #[derive(Entity)]
    struct LoginEvent {
        #[field(id)]
        id: i64,
    }

    let stmt = delete(LoginEvent { id: 1 }).assemble();
    assert_eq!(stmt.sql().unwrap(), "DELETE FROM `login_event`");
}

#[test]
fn dash_sentinel_keeps_the_field_name() {
    #[derive(Entity)]
    struct Note {
        #[field(column = "-")]
        body: String,
    }

    let stmt = insert(Note {
        body: "hi".into(),
    })
    .prepared(false)
    .assemble();
    assert_eq!(stmt.sql().unwrap(), "INSERT INTO `note`(`body`) VALUES('hi')");
}

#[test]
fn unmapped_kinds_never_reach_generated_clauses() {
    #[derive(Entity)]
    struct Mixed {
        #[field(id)]
        id: i32,
        ratio: f64,
        flag: bool,
        name: String,
    }

    let stmt = insert(Mixed {
        id: 1,
        ratio: 0.5,
        flag: true,
        name: "x".into(),
    })
    .assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "INSERT INTO `mixed`(`id`,`name`) VALUES(?,?)"
    );
}

#[test]
fn literal_insert_matches_inline_rendering() {
    let stmt = insert(user())
        .filter(["id", "name", "age"])
        .prepared(false)
        .assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "INSERT INTO `user`(`id`,`name`,`age`) VALUES(5,'Mike',18)"
    );
    assert!(stmt.values().is_empty());
}

#[test]
fn update_by_id_binds_fields_then_identity() {
    let stmt = update(user())
        .filter(["name", "age"])
        .by_id()
        .unwrap()
        .assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "UPDATE `user` SET `name`=?,`age`=? WHERE `id`=?"
    );
    assert_eq!(
        stmt.values(),
        vec![Value::from("Mike"), Value::Int(18), Value::Int(5)]
    );
}

#[test]
fn select_by_id_yields_identity_where_clause() {
    let stmt = select(user()).by_id().unwrap().assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "SELECT `id`,`name`,`age`,`phone`,`create_date`,`status` FROM `user` WHERE `id`=?"
    );
    assert_eq!(stmt.values(), vec![Value::Int(5)]);
}

#[test]
fn exec_routes_sql_and_values_through_the_adapter() {
    let adapter = MockAdapter::with_rows(Vec::new());
    let affected = insert(user())
        .filter(["id", "name"])
        .adapter(adapter.clone())
        .exec()
        .unwrap();
    assert_eq!(affected, 1);

    let (sql, values) = adapter.last_call();
    assert_eq!(sql, "INSERT INTO `user`(`id`,`name`) VALUES(?,?)");
    assert_eq!(values, vec![Value::Int(5), Value::from("Mike")]);
}

#[test]
fn config_supplies_the_default_adapter() {
    let adapter = MockAdapter::with_rows(Vec::new());
    let config = Config::new().adapter(adapter.clone());
    delete(user())
        .by_id()
        .unwrap()
        .config(config)
        .exec()
        .unwrap();

    let (sql, values) = adapter.last_call();
    assert_eq!(sql, "DELETE FROM `user` WHERE `id`=?");
    assert_eq!(values, vec![Value::Int(5)]);
}

#[test]
fn fetch_decodes_rows_back_into_records() {
    let adapter = MockAdapter::with_rows(vec![
        vec![
            Value::Int(1),
            Value::from("Tang"),
            Value::Int(30),
            Value::from("111"),
            Value::from(created()),
            Value::Int(1),
        ],
        vec![
            Value::Int(2),
            Value::from("Mike"),
            Value::Int(18),
            Value::from("222"),
            Value::from(created()),
            Value::Int(2),
        ],
    ]);

    let mut result = select(user()).adapter(adapter).fetch().unwrap();
    let mut seen = Vec::new();
    while result.has_next() {
        let mut row = user();
        assert!(result.decode(&mut row));
        seen.push((row.id, row.name));
    }
    assert_eq!(seen, vec![(1, "Tang".to_string()), (2, "Mike".to_string())]);
}

#[test]
fn fetch_one_returns_the_decoded_record() {
    let adapter = MockAdapter::with_rows(vec![vec![
        Value::Int(5),
        Value::from("Tang"),
        Value::Int(19),
        Value::from("333"),
        Value::from(created()),
        Value::Int(0),
    ]]);

    let found = select(user())
        .by_id()
        .unwrap()
        .adapter(adapter)
        .fetch_one()
        .unwrap();
    assert_eq!(found.name, "Tang");
    assert_eq!(found.age, 19);
}

#[test]
fn fetch_one_without_rows_is_not_found() {
    let adapter = MockAdapter::with_rows(Vec::new());
    let err = select(user())
        .by_id()
        .unwrap()
        .adapter(adapter)
        .fetch_one()
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn exec_count_sets_the_count_flag_and_reads_the_cell() {
    let adapter = MockAdapter::with_rows(vec![vec![Value::Int(42)]]);
    let cond = Condition::prepared().st("age", 23);
    let count = select(user())
        .cond(cond)
        .adapter(adapter.clone())
        .exec_count()
        .unwrap();
    assert_eq!(count, 42);

    let (sql, values) = adapter.last_call();
    assert_eq!(sql, "SELECT COUNT(1) FROM `user` WHERE age<?");
    assert_eq!(values, vec![Value::Int(23)]);
}

#[test]
fn plain_count_is_not_a_prepared_statement() {
    let adapter = MockAdapter::with_rows(vec![vec![Value::Int(7)]]);
    let count = select(user()).adapter(adapter.clone()).exec_count().unwrap();
    assert_eq!(count, 7);

    let (sql, values) = adapter.last_call();
    assert_eq!(sql, "SELECT COUNT(1) FROM `user`");
    assert!(values.is_empty());
}

#[test]
fn exec_count_without_rows_is_not_found() {
    let adapter = MockAdapter::with_rows(Vec::new());
    let err = select(user()).adapter(adapter).exec_count().unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn adapter_errors_pass_through_unmodified() {
    let err = insert(user())
        .adapter(MockAdapter::failing())
        .exec()
        .unwrap_err();
    match err {
        ForgeError::Adapter(source) => assert_eq!(source.to_string(), "gone away"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_adapter_is_a_typed_error() {
    assert!(matches!(
        insert(user()).exec().unwrap_err(),
        ForgeError::AdapterNotSet
    ));
}

#[test]
fn paged_query_with_prepared_condition() {
    let cond = Condition::prepared().like("name", "%T%");
    let stmt = select(user()).cond(cond).page(1, 10).assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "SELECT `id`,`name`,`age`,`phone`,`create_date`,`status` FROM `user` \
         WHERE name LIKE ? LIMIT 0,10"
    );
    assert_eq!(stmt.values(), vec![Value::from("%T%")]);
}

#[test]
fn grouped_condition_renders_through_the_statement() {
    let cond = Condition::new()
        .eq("age", 12)
        .and_group()
        .eq("status", 1)
        .or()
        .eq("name", "nihao");
    let stmt = select(user()).prepared(false).cond(cond).assemble();
    assert_eq!(
        stmt.sql().unwrap(),
        "SELECT `id`,`name`,`age`,`phone`,`create_date`,`status` FROM `user` \
         WHERE age=12 AND ( status=1 OR name='nihao')"
    );
}
