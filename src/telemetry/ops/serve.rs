op_marker!(Serve, "serve", [Bind => "bind"]);
