use std::any::Any;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{PgMapError, Result};
use crate::executor::{add_listener, snapshot, ListenerList, QueryExecutor, QueryOutcome};
use crate::mapper;
use crate::traits::{Entity, QueryListener, SenderId};
use crate::types::TabularResult;

/// The five CRUD statement templates of an entity type.
///
/// Templates may contain `{this.<Field>}` placeholders, filled with the
/// entity's field values before the statement is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTemplates {
    pub select: String,
    pub select_all: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

/// Entities that know their own statement templates.
pub trait EntityStatements: Entity {
    fn statements() -> StatementTemplates;
}

/// The CRUD capability set, independent of the entity type.
///
/// Lets providers for different entities sit behind one trait object.
/// Results are only reported through the provider's listeners.
pub trait StatementRunner: Send + Sync {
    /// Name of the entity type the runner serves.
    fn entity_name(&self) -> &'static str;

    fn run_query(&self, statement: &str, params: &[&str]);

    fn run_select(&self, entity: &dyn Any) -> Result<()>;

    fn run_select_all(&self);

    fn run_insert(&self, entity: &dyn Any) -> Result<()>;

    fn run_update(&self, entity: &dyn Any) -> Result<()>;

    fn run_delete(&self, entity: &dyn Any) -> Result<()>;

    fn run_delete_by_id(&self, id: &str);
}

/// Re-emits executor notifications as the provider's own.
struct Relay<T> {
    sender: SenderId,
    listeners: ListenerList<T>,
}

impl<T: Entity> QueryListener<T> for Relay<T> {
    fn error_received(&self, _: SenderId, message: &str) {
        for listener in snapshot(&self.listeners) {
            listener.error_received(self.sender, message);
        }
    }

    fn tabular_result_received(&self, _: SenderId, result: &TabularResult) {
        for listener in snapshot(&self.listeners) {
            listener.tabular_result_received(self.sender, result);
        }
    }

    fn entities_received(&self, _: SenderId, entities: &[T]) {
        for listener in snapshot(&self.listeners) {
            listener.entities_received(self.sender, entities);
        }
    }
}

/// Entity-shaped CRUD operations on top of a [`QueryExecutor`].
pub struct StatementProvider<T: Entity> {
    id: SenderId,
    templates: StatementTemplates,
    executor: QueryExecutor<T>,
    listeners: ListenerList<T>,
}

impl<T: Entity> StatementProvider<T> {
    pub fn new(executor: QueryExecutor<T>, templates: StatementTemplates) -> Self {
        let id = SenderId::next();
        let listeners = ListenerList::default();
        executor.subscribe(Arc::new(Relay {
            sender: id,
            listeners: Arc::clone(&listeners),
        }));
        Self {
            id,
            templates,
            executor,
            listeners,
        }
    }

    pub fn id(&self) -> SenderId {
        self.id
    }

    pub fn templates(&self) -> &StatementTemplates {
        &self.templates
    }

    pub fn executor(&self) -> &QueryExecutor<T> {
        &self.executor
    }

    pub fn subscribe(&self, listener: Arc<dyn QueryListener<T>>) {
        add_listener(&self.listeners, listener);
    }

    pub fn query(&self, statement: &str, params: &[&str]) -> JoinHandle<QueryOutcome<T>> {
        self.executor.run(statement, params)
    }

    pub fn select(&self, entity: &T) -> JoinHandle<QueryOutcome<T>> {
        self.run_filled(&self.templates.select, entity)
    }

    pub fn select_all(&self) -> JoinHandle<QueryOutcome<T>> {
        self.query(&self.templates.select_all, &[])
    }

    pub fn insert(&self, entity: &T) -> JoinHandle<QueryOutcome<T>> {
        self.run_filled(&self.templates.insert, entity)
    }

    pub fn update(&self, entity: &T) -> JoinHandle<QueryOutcome<T>> {
        self.run_filled(&self.templates.update, entity)
    }

    pub fn delete(&self, entity: &T) -> JoinHandle<QueryOutcome<T>> {
        self.run_filled(&self.templates.delete, entity)
    }

    /// Delete through a throwaway entity carrying only `id`.
    pub fn delete_by_id(&self, id: &str) -> JoinHandle<QueryOutcome<T>> {
        self.delete(&T::with_id(id))
    }

    fn run_filled(&self, template: &str, entity: &T) -> JoinHandle<QueryOutcome<T>> {
        self.query(&mapper::fill(template, entity), &[])
    }

    fn downcast(entity: &dyn Any) -> Result<&T> {
        entity
            .downcast_ref::<T>()
            .ok_or(PgMapError::EntityMismatch {
                expected: T::entity_name(),
            })
    }
}

impl<T: EntityStatements> StatementProvider<T> {
    /// A provider using the templates `T` declares.
    pub fn for_entity(executor: QueryExecutor<T>) -> Self {
        Self::new(executor, T::statements())
    }
}

impl<T: Entity> StatementRunner for StatementProvider<T> {
    fn entity_name(&self) -> &'static str {
        T::entity_name()
    }

    fn run_query(&self, statement: &str, params: &[&str]) {
        self.query(statement, params);
    }

    fn run_select(&self, entity: &dyn Any) -> Result<()> {
        self.select(Self::downcast(entity)?);
        Ok(())
    }

    fn run_select_all(&self) {
        self.select_all();
    }

    fn run_insert(&self, entity: &dyn Any) -> Result<()> {
        self.insert(Self::downcast(entity)?);
        Ok(())
    }

    fn run_update(&self, entity: &dyn Any) -> Result<()> {
        self.update(Self::downcast(entity)?);
        Ok(())
    }

    fn run_delete(&self, entity: &dyn Any) -> Result<()> {
        self.delete(Self::downcast(entity)?);
        Ok(())
    }

    fn run_delete_by_id(&self, id: &str) {
        self.delete_by_id(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionConfig;
    use crate::drivers::InMemoryTestDriver;
    use crate::traits::{DatabaseDriver, Field};
    use crate::types::FieldKind;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Customer {
        id: String,
        name: String,
    }

    impl Entity for Customer {
        fn entity_name() -> &'static str {
            "Customer"
        }

        fn fields() -> &'static [Field<Self>] {
            static FIELDS: [Field<Customer>; 2] = [
                Field::new("ID", FieldKind::Text, |c| c.id.clone().into(), |c, v| c.id = v.get()),
                Field::new("Name", FieldKind::Text, |c| c.name.clone().into(), |c, v| {
                    c.name = v.get()
                }),
            ];
            &FIELDS
        }
    }

    impl EntityStatements for Customer {
        fn statements() -> StatementTemplates {
            StatementTemplates {
                select: "SELECT * FROM Customer WHERE ID={this.ID}".to_string(),
                select_all: "SELECT * FROM Customer".to_string(),
                insert: "INSERT INTO Customer (ID, Name) VALUES ({this.ID}, '{this.Name}')"
                    .to_string(),
                update: "UPDATE Customer SET Name='{this.Name}' WHERE ID={this.ID}".to_string(),
                delete: "DELETE FROM Customer WHERE ID={this.ID}".to_string(),
            }
        }
    }

    fn provider() -> (Arc<InMemoryTestDriver>, StatementProvider<Customer>) {
        let driver = Arc::new(InMemoryTestDriver::new());
        let executor = QueryExecutor::new(
            Arc::clone(&driver) as Arc<dyn DatabaseDriver>,
            ConnectionConfig::new("memory://test"),
        );
        (driver, StatementProvider::for_entity(executor))
    }

    fn bob() -> Customer {
        Customer {
            id: "7".to_string(),
            name: "Bob".to_string(),
        }
    }

    #[tokio::test]
    async fn test_select_fills_template() {
        let (driver, provider) = provider();
        provider.select(&Customer::with_id("7")).await.unwrap();
        driver.assert_last_statement("SELECT * FROM Customer WHERE ID=7");
    }

    #[tokio::test]
    async fn test_crud_statements() {
        let (driver, provider) = provider();
        provider.select_all().await.unwrap();
        provider.insert(&bob()).await.unwrap();
        provider.update(&bob()).await.unwrap();
        provider.delete(&bob()).await.unwrap();
        provider.delete_by_id("9").await.unwrap();

        let sql: Vec<_> = driver
            .recorded_statements()
            .into_iter()
            .map(|s| s.sql)
            .collect();
        assert_eq!(
            sql,
            vec![
                "SELECT * FROM Customer",
                "INSERT INTO Customer (ID, Name) VALUES (7, 'Bob')",
                "UPDATE Customer SET Name='Bob' WHERE ID=7",
                "DELETE FROM Customer WHERE ID=7",
                "DELETE FROM Customer WHERE ID=9",
            ]
        );
    }

    #[tokio::test]
    async fn test_filled_statements_skip_positional_formatting() {
        let (driver, provider) = provider();
        let odd = Customer {
            id: "1".to_string(),
            name: "{0}".to_string(),
        };
        provider.update(&odd).await.unwrap();
        driver.assert_last_statement("UPDATE Customer SET Name='{0}' WHERE ID=1");
    }

    #[tokio::test]
    async fn test_runner_rejects_other_entity_types() {
        let (driver, provider) = provider();
        let runner: &dyn StatementRunner = &provider;
        assert_eq!(runner.entity_name(), "Customer");
        assert!(matches!(
            runner.run_insert(&"not a customer"),
            Err(PgMapError::EntityMismatch { expected: "Customer" })
        ));
        driver.assert_statement_count(0);
    }
}
