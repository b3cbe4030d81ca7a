use super::EntityMetadata;

/// Корень агрегата: данные записи плюс статические имена для БД
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    fn metadata(&self) -> &EntityMetadata;

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "report")
    fn collection_name() -> &'static str;

    /// Полное имя агрегата (например, "a001_report")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Имя таблицы в БД
    fn table_name() -> String {
        Self::full_name()
    }
}
