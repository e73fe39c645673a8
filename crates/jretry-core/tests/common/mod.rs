pub mod jenkins_server;
