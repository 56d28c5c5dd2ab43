// inspect: read the embedded migration set; migrate: apply it
op_marker!(Init, "init", [Inspect => "inspect", Migrate => "migrate"]);
