use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum UserPreferences {
    Table,
    UserId,
    Diet,
    Allergies,
    BudgetLimit,
    MaxPrepMinutes,
    Pantry,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum MealPlan {
    Table,
    Id,
    UserId,
    WeekStart,
    GeneratedAt,
    TotalCost,
    TotalCalories,
    Payload,
}

#[derive(Iden, Clone)]
pub enum FeatureLog {
    Table,
    Id,
    UserId,
    PlanId,
    Event,
    Payload,
    CreatedAt,
}
