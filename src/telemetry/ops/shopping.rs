// source -> aggregate -> materialize, in execution order
op_marker!(Shopping, "shopping", [
    Validate => "validate",
    FetchIngredients => "fetch_ingredients",
    Aggregate => "aggregate",
    ResolveList => "resolve_list",
    AppendItems => "append_items",
]);
