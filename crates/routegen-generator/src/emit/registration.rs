//! The registration artifact.
//!
//! One static class with two extension methods:
//!
//! - the DI method registers every distinct outer type as scoped
//! - the routing method constructs each handler with its parameterless
//!   constructor and calls the contract operation on it
//!
//! Calls go through a cast to the contract so handlers that implement it
//! explicitly still work. Every type name is written with `global::` so user
//! namespaces cannot shadow it.

use routegen_core::GeneratorOptions;

use super::writer::SourceWriter;
use super::{AUTO_GENERATED_HEADER, global};
use crate::aggregator::HandlerSet;

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_registration(handlers: &HandlerSet, options: &GeneratorOptions) -> String {
    let services_type = global(options.service_collection_type());
    let builder_type = global(options.route_builder_type());
    let contract = global(&options.marker_contract().to_string());

    let mut writer = SourceWriter::new();
    for line in AUTO_GENERATED_HEADER {
        writer.line(line);
    }
    writer
        .blank()
        .line(&format!("using {};", options.di_namespace()))
        .blank()
        .line(&format!("namespace {};", options.contract_namespace()))
        .blank()
        .open(&format!("public static class {}", options.registration_class()));

    writer.open(&format!(
        "public static {services_type} {}(this {services_type} services)",
        options.add_method()
    ));
    for outer in handlers.outer_types() {
        writer.line(&format!("services.AddScoped<{}>();", global(outer)));
    }
    writer.line("return services;").close();

    writer.blank().open(&format!(
        "public static {builder_type} {}(this {builder_type} endpoints)",
        options.map_method()
    ));
    for handler in handlers {
        writer.line(&format!(
            "(({contract})new {}()).{}(endpoints);",
            global(&handler.handler_qualified_name()),
            options.contract_method()
        ));
    }
    writer.line("return endpoints;").close();

    writer.close();
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HandlerDescriptor;
    use pretty_assertions::assert_eq;

    fn handler(namespace: &str, outer: &str, name: &str) -> HandlerDescriptor {
        HandlerDescriptor::new(outer, namespace, format!("{namespace}.{outer}"), name, vec![])
    }

    #[test]
    fn empty_set_still_emits_both_methods() {
        assert_eq!(
            emit_registration(&HandlerSet::new(), &GeneratorOptions::default()),
            "\
// <auto-generated/>
#nullable enable

using Microsoft.Extensions.DependencyInjection;

namespace Routegen;

public static class EndpointRegistration
{
    public static global::Microsoft.Extensions.DependencyInjection.IServiceCollection AddEndpoints(this global::Microsoft.Extensions.DependencyInjection.IServiceCollection services)
    {
        return services;
    }

    public static global::Microsoft.AspNetCore.Routing.IEndpointRouteBuilder MapEndpoints(this global::Microsoft.AspNetCore.Routing.IEndpointRouteBuilder endpoints)
    {
        return endpoints;
    }
}
"
        );
    }

    #[test]
    fn registers_each_outer_type_once_and_maps_each_handler() {
        let set = HandlerSet::from_descriptors([
            handler("App.Users", "Users", "List"),
            handler("App.Users", "Users", "Create"),
            handler("App", "GetTime", "Endpoint"),
        ]);
        let text = emit_registration(&set, &GeneratorOptions::default());

        assert_eq!(text.matches("services.AddScoped<global::App.Users.Users>();").count(), 1);
        assert!(text.contains("services.AddScoped<global::App.GetTime>();"));

        let mapped: Vec<&str> = text
            .lines()
            .filter(|line| line.contains(").MapEndpoint(endpoints);"))
            .map(str::trim)
            .collect();
        assert_eq!(
            mapped,
            vec![
                "((global::Routegen.IEndpoint)new global::App.GetTime.Endpoint()).MapEndpoint(endpoints);",
                "((global::Routegen.IEndpoint)new global::App.Users.Users.Create()).MapEndpoint(endpoints);",
                "((global::Routegen.IEndpoint)new global::App.Users.Users.List()).MapEndpoint(endpoints);",
            ]
        );
    }

    #[test]
    fn follows_options() {
        let options = GeneratorOptions::new()
            .with_contract_namespace("Acme")
            .with_registration_class("Routes")
            .with_add_method("AddRoutes")
            .with_map_method("MapRoutes")
            .with_contract_method("Map");
        let set = HandlerSet::from_descriptors([handler("Shop", "Orders", "Endpoint")]);
        let text = emit_registration(&set, &options);
        assert!(text.contains("namespace Acme;"));
        assert!(text.contains("public static class Routes"));
        assert!(text.contains(" AddRoutes(this "));
        assert!(text.contains(" MapRoutes(this "));
        assert!(text.contains("((global::Acme.IEndpoint)new global::Shop.Orders.Endpoint()).Map(endpoints);"));
    }

    #[test]
    fn deterministic() {
        let set = HandlerSet::from_descriptors([handler("App", "A", "Endpoint")]);
        let options = GeneratorOptions::default();
        assert_eq!(emit_registration(&set, &options), emit_registration(&set, &options));
    }
}
