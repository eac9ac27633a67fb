//! End-to-end tests: sources in, generated artifacts out.


use pretty_assertions::assert_eq;
use routegen::{GeneratorOptions, StepReason};
use test_harness::*;

const GET_TIME: &str = r#"
using Routegen;
using Microsoft.AspNetCore.Routing;

namespace TestApp;

public class GetTimeEndpoint
{
    public class Endpoint : IEndpoint
    {
        public void MapEndpoint(IEndpointRouteBuilder endpoints) { }
    }
}
"#;

#[test]
fn emits_contract_interface() {
    let result = run_generator("");
    assert_eq!(
        contract(&result),
        "\
// <auto-generated/>
#nullable enable

namespace Routegen;

public interface IEndpoint
{
    void MapEndpoint(global::Microsoft.AspNetCore.Routing.IEndpointRouteBuilder endpoints);
}
"
    );
    assert_eq!(
        result.artifacts.post_init[0].hint_name,
        "IEndpoint.g.cs"
    );
}

#[test]
fn emits_both_registration_methods_without_handlers() {
    let result = run_generator("");
    let text = registration(&result);
    assert!(text.contains("AddEndpoints(this "));
    assert!(text.contains("MapEndpoints(this "));
    assert!(result.handlers.is_empty());
    assert_eq!(compile_with_output(&[], &result), vec![]);
}

#[test]
fn registers_nested_endpoint() {
    let result = run_generator(GET_TIME);
    assert_clean(&result);
    assert_eq!(
        registration(&result),
        "\
// <auto-generated/>
#nullable enable

using Microsoft.Extensions.DependencyInjection;

namespace Routegen;

public static class EndpointRegistration
{
    public static global::Microsoft.Extensions.DependencyInjection.IServiceCollection AddEndpoints(this global::Microsoft.Extensions.DependencyInjection.IServiceCollection services)
    {
        services.AddScoped<global::TestApp.GetTimeEndpoint>();
        return services;
    }

    public static global::Microsoft.AspNetCore.Routing.IEndpointRouteBuilder MapEndpoints(this global::Microsoft.AspNetCore.Routing.IEndpointRouteBuilder endpoints)
    {
        ((global::Routegen.IEndpoint)new global::TestApp.GetTimeEndpoint.Endpoint()).MapEndpoint(endpoints);
        return endpoints;
    }
}
"
    );
    assert_eq!(compile_with_output(&[("Program.cs", GET_TIME)], &result), vec![]);
}

#[test]
fn ignores_non_nested_classes() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace TestApp;

        public class NotNestedEndpoint : IEndpoint
        {
            public void MapEndpoint(Microsoft.AspNetCore.Routing.IEndpointRouteBuilder endpoints) { }
        }
        "#,
    );
    assert_clean(&result);
    assert!(result.handlers.is_empty());
    assert!(!registration(&result).contains("NotNestedEndpoint"));
}

#[test]
fn registers_multiple_endpoints() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace TestApp;

        public class GetTimeEndpoint
        {
            public class Endpoint : IEndpoint { }
        }

        public class CreateUserEndpoint
        {
            public class Endpoint : IEndpoint { }
        }
        "#,
    );
    let text = registration(&result);
    assert!(text.contains("services.AddScoped<global::TestApp.GetTimeEndpoint>();"));
    assert!(text.contains("services.AddScoped<global::TestApp.CreateUserEndpoint>();"));
    assert_eq!(result.handlers.len(), 2);
}

#[test]
fn endpoints_in_different_namespaces() {
    let result = run_generator(
        r#"
        using Routegen;

        namespace App.Users
        {
            public class GetUserEndpoint
            {
                public class Endpoint : IEndpoint { }
            }
        }

        namespace App.Orders
        {
            public class GetOrderEndpoint
            {
                public class Endpoint : IEndpoint { }
            }
        }
        "#,
    );
    let text = registration(&result);
    assert!(text.contains("services.AddScoped<global::App.Users.GetUserEndpoint>();"));
    assert!(text.contains("services.AddScoped<global::App.Orders.GetOrderEndpoint>();"));

    let namespaces: Vec<&str> = result
        .handlers
        .iter()
        .map(|h| h.outer_type_namespace.as_str())
        .collect();
    assert_eq!(namespaces, vec!["App.Orders", "App.Users"]);
}

#[test]
fn handler_name_is_not_assumed() {
    let result = run_generator(
        r#"
        namespace Health;
        class Probe
        {
            sealed class Liveness : global::Routegen.IEndpoint { }
        }
        "#,
    );
    assert!(registration(&result)
        .contains("((global::Routegen.IEndpoint)new global::Health.Probe.Liveness()).MapEndpoint(endpoints);"));
}

#[test]
fn shared_outer_type_registered_once() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace Shop;

        public class Orders
        {
            public class List : IEndpoint { }
            public class Create : IEndpoint { }
        }
        "#,
    );
    let text = registration(&result);
    assert_eq!(text.matches("services.AddScoped<global::Shop.Orders>();").count(), 1);
    assert_eq!(text.matches(").MapEndpoint(endpoints);").count(), 2);
}

#[test]
fn marker_inherited_through_base_types() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace App;

        public interface IGetEndpoint : IEndpoint { }
        public abstract class EndpointBase : IGetEndpoint { }

        public class Status
        {
            public class Endpoint : EndpointBase { }
        }
        "#,
    );
    assert_clean(&result);
    let names: Vec<String> = result
        .handlers
        .iter()
        .map(|h| h.handler_qualified_name())
        .collect();
    assert_eq!(names, vec!["App.Status.Endpoint"]);
}

#[test]
fn same_named_contract_elsewhere_does_not_count() {
    let result = run_generator(
        r#"
        namespace Other
        {
            public interface IEndpoint { }
        }
        namespace App
        {
            public class Fake
            {
                public class Endpoint : Other.IEndpoint { }
            }
        }
        "#,
    );
    assert!(result.handlers.is_empty());
}

#[test]
fn constructor_parameters_are_recorded() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace App;

        public interface IClock { }

        public class GetTime
        {
            public GetTime() { }
            public GetTime(IClock clock, int offset) { }
            public GetTime(string format) { }

            public class Endpoint : IEndpoint { }
        }

        public record Health(IClock Clock)
        {
            public class Endpoint : IEndpoint { }
        }
        "#,
    );
    let params: Vec<(String, Vec<String>)> = result
        .handlers
        .iter()
        .map(|h| {
            (
                h.outer_type_qualified_name.clone(),
                h.constructor_parameter_types.clone(),
            )
        })
        .collect();
    assert_eq!(
        params,
        vec![
            (
                "App.GetTime".to_string(),
                vec!["App.IClock".to_string(), "int".to_string()]
            ),
            ("App.Health".to_string(), vec!["App.IClock".to_string()]),
        ]
    );
}

#[test]
fn generic_outer_types_are_skipped() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace App;

        public class Repository<T>
        {
            public class Endpoint : IEndpoint { }
        }
        "#,
    );
    assert!(result.handlers.is_empty());
}

#[test]
fn value_type_outer_types_are_not_registered() {
    let result = run_generator(
        r#"
        namespace N;

        public struct S
        {
            public class H : Routegen.IEndpoint { }
        }

        public record struct V
        {
            public class H : Routegen.IEndpoint { }
        }

        public record R
        {
            public class H : Routegen.IEndpoint { }
        }
        "#,
    );
    assert_clean(&result);
    let text = registration(&result);
    assert!(!text.contains("AddScoped<global::N.S>"));
    assert!(!text.contains("AddScoped<global::N.V>"));
    assert_eq!(text.matches("services.AddScoped<").count(), 1);
    assert!(text.contains("services.AddScoped<global::N.R>();"));
}

#[test]
fn output_order_does_not_depend_on_file_order() {
    let a = ("A.cs", "namespace B { class Two { class Endpoint : Routegen.IEndpoint { } } }");
    let b = ("B.cs", "namespace A { class One { class Endpoint : Routegen.IEndpoint { } } }");

    let forward = GeneratorHarness::new().run(&[a, b]);
    let backward = GeneratorHarness::new().run(&[b, a]);
    assert_eq!(registration(&forward), registration(&backward));
}

#[test]
fn custom_options_flow_into_output() {
    let options = GeneratorOptions::default()
        .with_contract_namespace("Acme.Web")
        .with_contract_name("IRoute")
        .with_contract_method("Map")
        .with_registration_class("Routes")
        .with_add_method("AddRoutes")
        .with_map_method("MapRoutes")
        .with_contract_hint("IRoute.g.cs")
        .with_registration_hint("Routes.g.cs");
    let mut harness = GeneratorHarness::with_options(options);
    let source = "namespace Site; class Home { class Index : Acme.Web.IRoute { } }";
    let result = harness.run(&[("Home.cs", source)]);

    assert!(result.artifacts.get("IRoute.g.cs").is_some());
    let text = result.artifacts.get("Routes.g.cs").unwrap().source.as_str();
    assert!(text.contains("public static class Routes"));
    assert!(text.contains("((global::Acme.Web.IRoute)new global::Site.Home.Index()).Map(endpoints);"));
    assert_eq!(compile_with_output(&[("Home.cs", source)], &result), vec![]);
}

#[test]
fn parse_errors_are_reported_but_do_not_stop_discovery() {
    let result = run_generator(
        r#"
        using Routegen;
        namespace App;

        class Broken {
            int = 5;
        }

        class Works
        {
            class Endpoint : IEndpoint { }
        }
        "#,
    );
    assert!(!result.parse_diagnostics.is_empty());
    assert_eq!(result.parse_diagnostics[0].0, "Program.cs");
    assert_eq!(result.handlers.len(), 1);
    assert_eq!(result.file_reason("Program.cs"), Some(StepReason::New));
}
